//! Pre-trained forecasting models
//!
//! Models are opaque, immutable artifacts. Each one owns its required input
//! length, its output width and the postprocessing applied around inference,
//! so one prediction path serves every model shape.

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

pub mod linear;
pub mod mlp;
pub mod set;

pub use linear::LinearModel;
pub use mlp::{Activation, DenseLayer, MlpModel};
pub use set::ModelSet;

/// Transformations applied around a model call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Postprocess {
    /// Inputs are multiplied and outputs divided by this factor, matching
    /// the normalization the model was trained with
    pub scale: f64,
    /// Negative outputs are replaced by zero
    pub clip_negative: bool,
    /// Outputs are rounded to the nearest integer
    pub round: bool,
}

impl Default for Postprocess {
    fn default() -> Self {
        Self {
            scale: 1.0,
            clip_negative: true,
            round: false,
        }
    }
}

impl Postprocess {
    /// Policy for count models: unscaled, rounded, non-negative
    pub fn counts() -> Self {
        Self {
            scale: 1.0,
            clip_negative: true,
            round: true,
        }
    }

    /// Policy for a rate model trained on inputs multiplied by `scale`
    pub fn scaled(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Apply the output side of the policy to raw model outputs
    pub fn finish(&self, raw: Vec<f64>) -> Vec<f64> {
        raw.into_iter()
            .map(|v| {
                let mut v = v / self.scale;
                if self.round {
                    v = v.round();
                }
                if self.clip_negative && v < 0.0 {
                    v = 0.0;
                }
                v
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(ForecastError::ModelLoadError(format!(
                "scale factor must be finite and non-zero, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Metadata every model artifact carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,
    /// Number of values the model consumes
    pub input_len: usize,
    /// Number of values the model produces
    pub output_width: usize,
    #[serde(default)]
    pub postprocess: Postprocess,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>, input_len: usize, output_width: usize) -> Self {
        Self {
            name: name.into(),
            input_len,
            output_width,
            postprocess: Postprocess::default(),
        }
    }

    /// Replace the postprocessing policy
    pub fn with_postprocess(mut self, postprocess: Postprocess) -> Self {
        self.postprocess = postprocess;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.input_len == 0 || self.output_width == 0 {
            return Err(ForecastError::ModelLoadError(format!(
                "model '{}' must have positive input length and output width",
                self.name
            )));
        }
        self.postprocess.validate()
    }

    /// Check that a window matches the declared input length
    pub(crate) fn check_input(&self, window: &[f64]) -> Result<()> {
        if window.len() != self.input_len {
            return Err(ForecastError::ModelError(format!(
                "model '{}' expects {} inputs, got {}",
                self.name,
                self.input_len,
                window.len()
            )));
        }
        Ok(())
    }
}

/// A loaded inference artifact.
///
/// Implementations must not change after construction; a single instance is
/// shared read-only by every region computation.
pub trait Forecaster: Send + Sync + Debug {
    /// Metadata describing the model's shape and postprocessing
    fn metadata(&self) -> &ModelMetadata;

    /// Raw model call on a window of exactly `required_window_length` values
    fn infer(&self, window: &[f64]) -> Result<Vec<f64>>;

    /// Input length the model requires
    fn required_window_length(&self) -> usize {
        self.metadata().input_len
    }

    /// Number of values one call produces
    fn output_width(&self) -> usize {
        self.metadata().output_width
    }

    fn name(&self) -> &str {
        &self.metadata().name
    }
}

/// A serialized model, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Mlp(MlpModel),
}

impl ModelArtifact {
    /// Load and validate an artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ForecastError::ModelLoadError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ForecastError::ModelLoadError(msg) => {
                ForecastError::ModelLoadError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate an artifact from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(content)
            .map_err(|e| ForecastError::ModelLoadError(format!("invalid artifact: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Serialize the artifact as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::Mlp(model) => model.validate(),
        }
    }
}

impl Forecaster for ModelArtifact {
    fn metadata(&self) -> &ModelMetadata {
        match self {
            ModelArtifact::Linear(model) => model.metadata(),
            ModelArtifact::Mlp(model) => model.metadata(),
        }
    }

    fn infer(&self, window: &[f64]) -> Result<Vec<f64>> {
        match self {
            ModelArtifact::Linear(model) => model.infer(window),
            ModelArtifact::Mlp(model) => model.infer(window),
        }
    }
}

impl From<LinearModel> for ModelArtifact {
    fn from(model: LinearModel) -> Self {
        ModelArtifact::Linear(model)
    }
}

impl From<MlpModel> for ModelArtifact {
    fn from(model: MlpModel) -> Self {
        ModelArtifact::Mlp(model)
    }
}
