//! Feed-forward network artifact

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::{Forecaster, ModelMetadata};

/// Elementwise activation applied after a dense layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Tanh,
}

impl Activation {
    fn apply(self, v: f64) -> f64 {
        match self {
            Activation::Identity => v,
            Activation::Relu => v.max(0.0),
            Activation::Tanh => v.tanh(),
        }
    }
}

/// Fully connected layer: `activation(W x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// One row per output unit
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let z = b + row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>();
                self.activation.apply(z)
            })
            .collect()
    }
}

/// Stack of dense layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpModel {
    metadata: ModelMetadata,
    layers: Vec<DenseLayer>,
}

impl MlpModel {
    pub fn new(metadata: ModelMetadata, layers: Vec<DenseLayer>) -> Result<Self> {
        let model = Self { metadata, layers };
        model.validate()?;
        Ok(model)
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.metadata.validate()?;
        let name = &self.metadata.name;
        if self.layers.is_empty() {
            return Err(ForecastError::ModelLoadError(format!(
                "model '{}' has no layers",
                name
            )));
        }

        let mut width = self.metadata.input_len;
        for (i, layer) in self.layers.iter().enumerate() {
            let rows_ok = layer.weights.iter().all(|row| row.len() == width);
            if layer.inputs() != width || !rows_ok || layer.bias.len() != layer.outputs() {
                return Err(ForecastError::ModelLoadError(format!(
                    "model '{}': layer {} does not accept {} inputs",
                    name, i, width
                )));
            }
            let finite = layer
                .weights
                .iter()
                .flatten()
                .chain(layer.bias.iter())
                .all(|v| v.is_finite());
            if !finite {
                return Err(ForecastError::ModelLoadError(format!(
                    "model '{}': layer {} has non-finite parameters",
                    name, i
                )));
            }
            width = layer.outputs();
        }

        if width != self.metadata.output_width {
            return Err(ForecastError::ModelLoadError(format!(
                "model '{}': final layer yields {} values, metadata declares {}",
                name, width, self.metadata.output_width
            )));
        }
        Ok(())
    }
}

impl Forecaster for MlpModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn infer(&self, window: &[f64]) -> Result<Vec<f64>> {
        self.metadata.check_input(window)?;
        let mut activations = window.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        Ok(activations)
    }
}
