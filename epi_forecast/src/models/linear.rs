//! Dense linear regression artifact: `y = W x + b`

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::{Forecaster, ModelMetadata};

/// Multi-output linear regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    metadata: ModelMetadata,
    /// One row of `input_len` coefficients per output
    weights: Vec<Vec<f64>>,
    /// One intercept per output
    bias: Vec<f64>,
}

impl LinearModel {
    /// Create a model, checking that weights match the metadata shape
    pub fn new(metadata: ModelMetadata, weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self> {
        let model = Self {
            metadata,
            weights,
            bias,
        };
        model.validate()?;
        Ok(model)
    }

    /// Model whose every output copies input position `index`
    pub fn selector(metadata: ModelMetadata, index: usize) -> Result<Self> {
        if index >= metadata.input_len {
            return Err(ForecastError::InvalidParameter(format!(
                "selector index {} outside input length {}",
                index, metadata.input_len
            )));
        }
        let mut row = vec![0.0; metadata.input_len];
        row[index] = 1.0;
        let weights = vec![row; metadata.output_width];
        let bias = vec![0.0; metadata.output_width];
        Self::new(metadata, weights, bias)
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.metadata.validate()?;
        let meta = &self.metadata;
        if self.weights.len() != meta.output_width || self.bias.len() != meta.output_width {
            return Err(ForecastError::ModelLoadError(format!(
                "model '{}': expected {} weight rows and biases, got {} and {}",
                meta.name,
                meta.output_width,
                self.weights.len(),
                self.bias.len()
            )));
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != meta.input_len) {
            return Err(ForecastError::ModelLoadError(format!(
                "model '{}': weight row has {} coefficients, expected {}",
                meta.name,
                row.len(),
                meta.input_len
            )));
        }
        let finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.bias.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(ForecastError::ModelLoadError(format!(
                "model '{}' has non-finite parameters",
                meta.name
            )));
        }
        Ok(())
    }
}

impl Forecaster for LinearModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn infer(&self, window: &[f64]) -> Result<Vec<f64>> {
        self.metadata.check_input(window)?;
        Ok(self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| b + row.iter().zip(window).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }
}
