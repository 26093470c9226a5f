//! Models loaded for a run, one per predicted feature

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ModelPaths;
use crate::error::{ForecastError, Result};
use crate::features::Feature;
use crate::models::{Forecaster, ModelArtifact};

/// Load outcome of every feature's model.
///
/// `Feature::TruePositive` holds the rate model; the count features hold the
/// auxiliary models. A failed load is kept as its message so that requests
/// for that feature fail while the others keep working; a feature that was
/// never configured has no entry at all.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    entries: BTreeMap<Feature, std::result::Result<Arc<dyn Forecaster>, String>>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every configured artifact; features without a path stay absent
    pub fn load(paths: &ModelPaths) -> Self {
        let mut set = Self::new();
        let configured = [
            (Feature::TruePositive, &paths.rate),
            (Feature::Cases, &paths.cases),
            (Feature::Deaths, &paths.deaths),
            (Feature::Tests, &paths.tests),
        ];

        for (feature, path) in configured {
            if let Some(path) = path {
                set.load_feature(feature, path);
            }
        }
        set
    }

    /// Load one artifact for `feature`, recording failure instead of returning it
    pub fn load_feature(&mut self, feature: Feature, path: &Path) {
        let outcome = match ModelArtifact::load(path) {
            Ok(artifact) => {
                info!(
                    %feature,
                    model = artifact.name(),
                    input_len = artifact.required_window_length(),
                    output_width = artifact.output_width(),
                    "loaded model"
                );
                Ok(Arc::new(artifact) as Arc<dyn Forecaster>)
            }
            Err(e) => {
                warn!(%feature, error = %e, "model unavailable");
                match e {
                    ForecastError::ModelLoadError(msg) => Err(msg),
                    other => Err(other.to_string()),
                }
            }
        };
        self.entries.insert(feature, outcome);
    }

    /// Register an already constructed model
    pub fn insert(&mut self, feature: Feature, model: Arc<dyn Forecaster>) {
        self.entries.insert(feature, Ok(model));
    }

    /// Builder-style [`ModelSet::insert`]
    pub fn with_model(mut self, feature: Feature, model: Arc<dyn Forecaster>) -> Self {
        self.insert(feature, model);
        self
    }

    /// Model for `feature`, or the reason it is unavailable
    pub fn get(&self, feature: Feature) -> Result<Arc<dyn Forecaster>> {
        match self.entries.get(&feature) {
            Some(Ok(model)) => Ok(Arc::clone(model)),
            Some(Err(reason)) => Err(ForecastError::ModelLoadError(reason.clone())),
            None => Err(ForecastError::ModelLoadError(format!(
                "no model loaded for {}",
                feature
            ))),
        }
    }

    /// The positivity-rate model
    pub fn rate(&self) -> Result<Arc<dyn Forecaster>> {
        self.get(Feature::TruePositive)
    }

    /// True when a model was requested for `feature`, loaded or not
    pub fn is_configured(&self, feature: Feature) -> bool {
        self.entries.contains_key(&feature)
    }

    /// True when a model is available for `feature`
    pub fn has(&self, feature: Feature) -> bool {
        matches!(self.entries.get(&feature), Some(Ok(_)))
    }
}
