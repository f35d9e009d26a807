use serde::{Deserialize, Serialize};

/// A single (m/z, intensity) pair of a centroided spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub mz: f64,
    pub intensity: f64,
}

impl DataPoint {
    pub fn new(mz: f64, intensity: f64) -> Self {
        DataPoint { mz, intensity }
    }
}

/// A centroided mass spectrum as supplied by a raw-data provider.
///
/// Retention time is given in minutes. `precursor_mz` is only populated for
/// fragment spectra (`ms_level == 2`); the peak arrays are parallel vectors
/// and are never mutated after construction.
///
/// # Example
///
/// ```rust
/// # use dfscore::data::spectrum::Spectrum;
/// let spectrum = Spectrum::new(1, 2, Some(500.0), 12.5, vec![100.0, 200.0], vec![10.0, 20.0]);
/// assert_eq!(spectrum.base_peak().unwrap().mz, 200.0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Spectrum {
    pub scan_id: i32,
    pub ms_level: u8,
    pub precursor_mz: Option<f64>,
    pub retention_time: f64,
    pub mz: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl Spectrum {
    pub fn new(
        scan_id: i32,
        ms_level: u8,
        precursor_mz: Option<f64>,
        retention_time: f64,
        mz: Vec<f64>,
        intensity: Vec<f64>,
    ) -> Self {
        Spectrum {
            scan_id,
            ms_level,
            precursor_mz,
            retention_time,
            mz,
            intensity,
        }
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    /// The most intense data point of the spectrum, if any.
    ///
    /// Ties are broken towards the first occurrence, keeping the result
    /// deterministic for equal intensities.
    pub fn base_peak(&self) -> Option<DataPoint> {
        let mut best: Option<DataPoint> = None;
        for (mz, intensity) in self.mz.iter().zip(self.intensity.iter()) {
            match best {
                Some(b) if b.intensity >= *intensity => {}
                _ => best = Some(DataPoint::new(*mz, *intensity)),
            }
        }
        best
    }

    /// The most intense data point within the closed m/z window `[mz_min, mz_max]`.
    pub fn base_peak_within(&self, mz_min: f64, mz_max: f64) -> Option<DataPoint> {
        let mut best: Option<DataPoint> = None;
        for (mz, intensity) in self.mz.iter().zip(self.intensity.iter()) {
            if *mz < mz_min || *mz > mz_max {
                continue;
            }
            match best {
                Some(b) if b.intensity >= *intensity => {}
                _ => best = Some(DataPoint::new(*mz, *intensity)),
            }
        }
        best
    }

    /// All data points with intensity strictly above `threshold`, in m/z order
    /// of the underlying arrays.
    pub fn points_over(&self, threshold: f64) -> Vec<DataPoint> {
        self.mz
            .iter()
            .zip(self.intensity.iter())
            .filter(|(_, intensity)| **intensity > threshold)
            .map(|(mz, intensity)| DataPoint::new(*mz, *intensity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> Spectrum {
        Spectrum::new(
            7,
            2,
            Some(500.0),
            11.0,
            vec![100.0, 150.0, 200.0],
            vec![10.0, 50.0, 50.0],
        )
    }

    #[test]
    fn base_peak_first_occurrence_wins() {
        let peak = spectrum().base_peak().unwrap();
        assert_eq!(peak.mz, 150.0);
        assert_eq!(peak.intensity, 50.0);
    }

    #[test]
    fn base_peak_of_empty_spectrum_is_none() {
        let empty = Spectrum::new(1, 1, None, 0.0, vec![], vec![]);
        assert!(empty.base_peak().is_none());
    }

    #[test]
    fn base_peak_within_window() {
        let peak = spectrum().base_peak_within(90.0, 120.0).unwrap();
        assert_eq!(peak.mz, 100.0);
        assert!(spectrum().base_peak_within(300.0, 400.0).is_none());
    }

    #[test]
    fn points_over_is_strict() {
        let points = spectrum().points_over(50.0);
        assert!(points.is_empty());
        let points = spectrum().points_over(49.9);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].mz, 150.0);
    }
}
