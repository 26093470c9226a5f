//! Retrospective forecast accuracy

use std::fmt;

use epi_math::WindowSet;
use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::predictors::predict_direct;

/// Error metrics for forecast evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// Number of compared values
    pub samples: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

impl fmt::Display for ErrorMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics ({} samples):", self.samples)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        write!(f, "  RMSE:  {:.4}", self.rmse)
    }
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ErrorMetrics> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;
    let (abs_sum, sq_sum) = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| a - f)
        .fold((0.0, 0.0), |(abs, sq), e| (abs + e.abs(), sq + e * e));

    let mse = sq_sum / n;
    Ok(ErrorMetrics {
        samples: forecast.len(),
        mae: abs_sum / n,
        mse,
        rmse: mse.sqrt(),
    })
}

/// Score a model's first output against every label of `windows`.
///
/// Each input row is predicted with [`predict_direct`], so the score
/// reflects the same scaling and clipping as a live forecast.
pub fn validate_on_windows(model: &dyn Forecaster, windows: &WindowSet) -> Result<ErrorMetrics> {
    if windows.is_empty() {
        return Err(ForecastError::InsufficientDataError {
            required: windows.window() + 1,
            available: windows.window(),
        });
    }

    let mut predicted = Vec::with_capacity(windows.len());
    for (input, _) in windows.pairs() {
        let first = predict_direct(model, input)?.first().copied().unwrap_or(0.0);
        predicted.push(first);
    }

    forecast_accuracy(&predicted, windows.labels())
}
