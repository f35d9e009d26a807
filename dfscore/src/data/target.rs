use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A named diagnostic target: the fragment ions and neutral losses that must
/// all be present in a spectrum for the target to be called.
///
/// `None` means "no constraint of this kind"; an empty catalog column loads
/// as `None`, so an m/z value of exactly 0 remains representable as a real
/// constraint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticTarget {
    pub name: String,
    pub fragment_mz: Option<Vec<f64>>,
    pub neutral_loss: Option<Vec<f64>>,
}

impl DiagnosticTarget {
    pub fn new(name: impl Into<String>, fragment_mz: Option<Vec<f64>>, neutral_loss: Option<Vec<f64>>) -> Self {
        DiagnosticTarget {
            name: name.into(),
            fragment_mz,
            neutral_loss,
        }
    }

    /// A target without any constraint can never be matched.
    pub fn is_searchable(&self) -> bool {
        self.fragment_mz.is_some() || self.neutral_loss.is_some()
    }
}

/// A precursor m/z and retention-time window already known and to be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExclusionWindow {
    pub mz: f64,
    pub rt_start: f64,
    pub rt_end: f64,
}

impl ExclusionWindow {
    pub fn new(mz: f64, rt_start: f64, rt_end: f64) -> Self {
        ExclusionWindow { mz, rt_start, rt_end }
    }

    /// Closed-interval containment check on retention time.
    pub fn contains_rt(&self, rt: f64) -> bool {
        self.rt_start <= rt && rt <= self.rt_end
    }
}

/// The outcome of classifying a single hit spectrum.
///
/// `matched_targets` keeps catalog order so that labels and exported rows are
/// byte-for-byte reproducible across runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub scan_id: i32,
    pub precursor_mz: f64,
    pub retention_time: f64,
    pub matched_targets: Vec<String>,
}

impl MatchResult {
    /// Formats the matched target names as `target=A;target=B`, without a
    /// trailing separator.
    pub fn label(&self) -> String {
        self.matched_targets
            .iter()
            .map(|name| format!("target={}", name))
            .join(";")
    }
}
