use serde::{Deserialize, Serialize};

use crate::data::spectrum::{DataPoint, Spectrum};
use crate::data::target::{DiagnosticTarget, ExclusionWindow, MatchResult};
use crate::data::tolerance::MzTolerance;

/// Everything the per-spectrum classifier needs to know, resolved once per
/// run and read-only afterwards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Closed precursor m/z acceptance range.
    pub precursor_mz_min: f64,
    pub precursor_mz_max: f64,
    /// Tolerance used for fragment, neutral-loss and exclusion comparisons.
    pub tolerance: MzTolerance,
    /// Fraction of the base-peak intensity (already divided by 100).
    pub base_peak_fraction: f64,
    /// Absolute intensity floor.
    pub min_intensity: f64,
}

/// Intensity threshold for candidate-peak selection.
///
/// When both components are configured the stricter (higher) one wins; a zero
/// component disables itself and the other is used alone.
pub fn intensity_threshold(base_peak_intensity: f64, base_peak_fraction: f64, min_intensity: f64) -> f64 {
    let relative = base_peak_intensity * base_peak_fraction;
    if base_peak_fraction == 0.0 {
        min_intensity
    } else if min_intensity == 0.0 {
        relative
    } else {
        relative.max(min_intensity)
    }
}

/// Whether the spectrum's precursor falls inside any exclusion window, i.e.
/// its m/z is within tolerance of the window m/z and its retention time lies
/// in the window's closed RT interval.
pub fn is_excluded(
    precursor_mz: f64,
    retention_time: f64,
    exclusions: &[ExclusionWindow],
    tolerance: &MzTolerance,
) -> bool {
    exclusions
        .iter()
        .any(|window| tolerance.contains(window.mz, precursor_mz) && window.contains_rt(retention_time))
}

fn any_peak_within(peaks: &[DataPoint], target_mz: f64, tolerance: &MzTolerance) -> bool {
    peaks.iter().any(|peak| tolerance.contains(target_mz, peak.mz))
}

/// Evaluates one target against the candidate peaks of a spectrum.
///
/// Every required fragment m/z must be witnessed by at least one candidate
/// peak, and every required neutral loss must be witnessed via
/// `precursor − loss`. An absent constraint is vacuously true, but a target
/// with no constraint at all never matches.
pub fn matches_target(
    target: &DiagnosticTarget,
    peaks: &[DataPoint],
    precursor_mz: f64,
    tolerance: &MzTolerance,
) -> bool {
    if !target.is_searchable() {
        return false;
    }

    let fragments_found = match &target.fragment_mz {
        None => true,
        Some(required) => required.iter().all(|&mz| any_peak_within(peaks, mz, tolerance)),
    };

    let losses_found = match &target.neutral_loss {
        None => true,
        Some(required) => required
            .iter()
            .all(|&loss| any_peak_within(peaks, precursor_mz - loss, tolerance)),
    };

    fragments_found && losses_found
}

/// Classifies a single spectrum against the loaded targets and exclusions.
///
/// Returns `None` for spectra that are not MS2, fall outside the precursor
/// range, are excluded, have no candidate peaks above the intensity
/// threshold, or match no target. Matched target names keep catalog order.
pub fn classify(
    spectrum: &Spectrum,
    targets: &[DiagnosticTarget],
    exclusions: &[ExclusionWindow],
    params: &ClassifierParams,
) -> Option<MatchResult> {
    if spectrum.ms_level != 2 {
        return None;
    }

    let precursor_mz = spectrum.precursor_mz?;

    if precursor_mz < params.precursor_mz_min || precursor_mz > params.precursor_mz_max {
        return None;
    }

    if is_excluded(precursor_mz, spectrum.retention_time, exclusions, &params.tolerance) {
        return None;
    }

    let base_peak = spectrum.base_peak()?;
    let threshold = intensity_threshold(base_peak.intensity, params.base_peak_fraction, params.min_intensity);
    let peaks = spectrum.points_over(threshold);
    if peaks.is_empty() {
        return None;
    }

    let matched_targets: Vec<String> = targets
        .iter()
        .filter(|target| matches_target(target, &peaks, precursor_mz, &params.tolerance))
        .map(|target| target.name.clone())
        .collect();

    if matched_targets.is_empty() {
        return None;
    }

    Some(MatchResult {
        scan_id: spectrum.scan_id,
        precursor_mz,
        retention_time: spectrum.retention_time,
        matched_targets,
    })
}
