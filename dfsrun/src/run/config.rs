use std::path::PathBuf;

use dfscore::algorithm::classify::ClassifierParams;
use dfscore::data::tolerance::{MzTolerance, RtTolerance};
use serde::{Deserialize, Serialize};

/// Resolved, typed configuration of a screening run.
///
/// Built once before the run and read-only afterwards; the task never reaches
/// back into any parameter store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Closed precursor m/z acceptance range.
    pub precursor_mz_min: f64,
    pub precursor_mz_max: f64,
    /// Mass tolerance shared by fragment, neutral-loss and exclusion checks.
    pub mz_tolerance: MzTolerance,
    /// RT half-window of the chromatogram built around each hit.
    pub rt_tolerance: RtTolerance,
    /// Fraction of the base-peak intensity (percent already divided by 100).
    pub base_peak_fraction: f64,
    /// Absolute intensity floor.
    pub min_intensity: f64,
    /// Diagnostic target catalog, CSV.
    pub catalog_path: PathBuf,
    /// Optional precursor/RT exclusion list, CSV. `None` disables exclusion.
    pub exclusion_path: Option<PathBuf>,
    /// Optional hit-list output path; may contain the `{}` source-name
    /// placeholder. `None` disables export.
    pub export_path: Option<PathBuf>,
    /// Whether to reconstruct a chromatogram and feature per hit.
    pub build_chromatograms: bool,
}

impl ScreenConfig {
    pub fn classifier_params(&self) -> ClassifierParams {
        ClassifierParams {
            precursor_mz_min: self.precursor_mz_min,
            precursor_mz_max: self.precursor_mz_max,
            tolerance: self.mz_tolerance,
            base_peak_fraction: self.base_peak_fraction,
            min_intensity: self.min_intensity,
        }
    }

    /// Human-readable parameter summary attached to the produced feature
    /// collection.
    pub fn describe(&self) -> String {
        format!(
            "precursor m/z [{}, {}], tolerance ±{} Da / {} ppm, rt ±{} min, base peak fraction {}, min intensity {}",
            self.precursor_mz_min,
            self.precursor_mz_max,
            self.mz_tolerance.da,
            self.mz_tolerance.ppm,
            self.rt_tolerance.minutes,
            self.base_peak_fraction,
            self.min_intensity
        )
    }
}
