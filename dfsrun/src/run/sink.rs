use dfscore::algorithm::chromatogram::Feature;
use serde::{Deserialize, Serialize};

/// Receives completed features and run metadata.
///
/// Row ids are assigned by the sink, sequentially from 1 within one run.
pub trait FeatureSink {
    fn accept(&mut self, feature: Feature);

    /// Marks the produced collection with a description of the applied
    /// parameters.
    fn set_applied_method(&mut self, description: String);
}

/// In-memory feature collection, the default sink.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub name: String,
    pub features: Vec<Feature>,
    pub applied_method: Option<String>,
}

impl FeatureCollection {
    pub fn new(name: impl Into<String>) -> Self {
        FeatureCollection {
            name: name.into(),
            features: Vec::new(),
            applied_method: None,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureSink for FeatureCollection {
    fn accept(&mut self, mut feature: Feature) {
        feature.row_id = self.features.len() + 1;
        self.features.push(feature);
    }

    fn set_applied_method(&mut self, description: String) {
        self.applied_method = Some(description);
    }
}
