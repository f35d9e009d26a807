use serde::{Deserialize, Serialize};

/// Symmetric mass tolerance with an absolute and a relative component.
///
/// The acceptance half-width at mass `m` is `max(da, m * ppm * 1e-6)`, so the
/// absolute component acts as a floor for low masses and the ppm component
/// takes over for high masses.
///
/// # Example
///
/// ```rust
/// # use dfscore::data::tolerance::MzTolerance;
/// let tolerance = MzTolerance::new(0.01, 10.0);
/// assert!(tolerance.contains(500.0, 500.005));
/// assert!(!tolerance.contains(500.0, 500.02));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MzTolerance {
    pub da: f64,
    pub ppm: f64,
}

impl MzTolerance {
    pub fn new(da: f64, ppm: f64) -> Self {
        MzTolerance { da, ppm }
    }

    pub fn half_width(&self, mz: f64) -> f64 {
        self.da.max(mz.abs() * self.ppm * 1e-6)
    }

    /// The closed acceptance interval around `mz`.
    pub fn bounds(&self, mz: f64) -> (f64, f64) {
        let w = self.half_width(mz);
        (mz - w, mz + w)
    }

    /// Whether `observed` lies within tolerance of the target mass `mz`.
    pub fn contains(&self, mz: f64, observed: f64) -> bool {
        (observed - mz).abs() <= self.half_width(mz)
    }
}

/// Symmetric retention-time tolerance in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtTolerance {
    pub minutes: f64,
}

impl RtTolerance {
    pub fn new(minutes: f64) -> Self {
        RtTolerance { minutes }
    }

    pub fn bounds(&self, rt: f64) -> (f64, f64) {
        (rt - self.minutes, rt + self.minutes)
    }
}
