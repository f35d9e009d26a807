use serde::{Deserialize, Serialize};

/// One point of an extracted-ion chromatogram: the base peak of a single MS1
/// scan within the precursor m/z window, or an explicit zero when the scan
/// holds no signal there.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromatogramPoint {
    pub scan_id: i32,
    pub mz: f64,
    pub retention_time: f64,
    pub intensity: f64,
}

impl ChromatogramPoint {
    pub fn new(scan_id: i32, mz: f64, retention_time: f64, intensity: f64) -> Self {
        ChromatogramPoint {
            scan_id,
            mz,
            retention_time,
            intensity,
        }
    }
}

/// Quantitative feature derived from the chromatogram of one hit spectrum.
///
/// Accumulated once in [`Feature::from_points`] and immutable afterwards,
/// except for the fragment-scan fields which the run layer resolves against
/// the raw-data provider, and the row id assigned by the feature collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature {
    /// Sequential id within the produced feature collection, assigned from 1.
    pub row_id: usize,
    /// Concatenation of the matched target names.
    pub label: String,
    /// Arithmetic mean of all point m/z values.
    pub mz: f64,
    /// Retention time of the apex point, minutes.
    pub retention_time: f64,
    pub height: f64,
    /// Trapezoidal integral of intensity over retention time in seconds.
    pub area: f64,
    pub representative_scan: Option<i32>,
    pub fragment_scan: Option<i32>,
    pub ms2_fragment_scans: Vec<i32>,
    pub rt_range: (f64, f64),
    pub mz_range: (f64, f64),
    pub intensity_range: (f64, f64),
    pub points: Vec<ChromatogramPoint>,
}

/// Trapezoidal integral of intensity over retention time, with retention time
/// converted from minutes to seconds before integration.
pub fn trapezoid_area_seconds(points: &[ChromatogramPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            let dt_seconds = (pair[1].retention_time - pair[0].retention_time) * 60.0;
            dt_seconds * (pair[0].intensity + pair[1].intensity) / 2.0
        })
        .sum()
}

impl Feature {
    /// Builds a feature from an ordered chromatogram.
    ///
    /// The apex (height, retention time, representative scan) is the point of
    /// maximum intensity, first occurrence winning on ties. An empty
    /// chromatogram yields a degenerate feature with area and height 0;
    /// absence of supporting MS1 evidence is a weak result, not an error.
    pub fn from_points(points: Vec<ChromatogramPoint>, label: String) -> Feature {
        if points.is_empty() {
            return Feature {
                row_id: 0,
                label,
                mz: 0.0,
                retention_time: 0.0,
                height: 0.0,
                area: 0.0,
                representative_scan: None,
                fragment_scan: None,
                ms2_fragment_scans: Vec::new(),
                rt_range: (0.0, 0.0),
                mz_range: (0.0, 0.0),
                intensity_range: (0.0, 0.0),
                points,
            };
        }

        let first = points[0];
        let mut rt_range = (first.retention_time, first.retention_time);
        let mut mz_range = (first.mz, first.mz);
        let mut intensity_range = (first.intensity, first.intensity);
        let mut mz_sum = 0.0;
        let mut height = 0.0;
        let mut apex_rt = 0.0;
        let mut representative_scan = None;

        for point in &points {
            rt_range = (rt_range.0.min(point.retention_time), rt_range.1.max(point.retention_time));
            mz_range = (mz_range.0.min(point.mz), mz_range.1.max(point.mz));
            intensity_range = (intensity_range.0.min(point.intensity), intensity_range.1.max(point.intensity));
            mz_sum += point.mz;

            if point.intensity > height {
                height = point.intensity;
                apex_rt = point.retention_time;
                representative_scan = Some(point.scan_id);
            }
        }

        let area = trapezoid_area_seconds(&points);
        let mz = mz_sum / points.len() as f64;

        Feature {
            row_id: 0,
            label,
            mz,
            retention_time: apex_rt,
            height,
            area,
            representative_scan,
            fragment_scan: None,
            ms2_fragment_scans: Vec::new(),
            rt_range,
            mz_range,
            intensity_range,
            points,
        }
    }
}
