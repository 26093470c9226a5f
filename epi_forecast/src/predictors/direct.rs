//! Single-call prediction

use crate::error::{ForecastError, Result};
use crate::models::{Forecaster, Postprocess};

/// Predict the model's full output from the most recent values of `history`.
///
/// The last `required_window_length` values are scaled by the model's
/// scale factor, passed to the model, and the outputs are divided by the
/// same factor before rounding and clipping per the model's policy.
pub fn predict_direct(model: &dyn Forecaster, history: &[f64]) -> Result<Vec<f64>> {
    predict_with_policy(model, history, model.metadata().postprocess)
}

/// [`predict_direct`] with `policy` in place of the model's own
pub(crate) fn predict_with_policy(
    model: &dyn Forecaster,
    history: &[f64],
    policy: Postprocess,
) -> Result<Vec<f64>> {
    let required = model.required_window_length();
    if history.len() < required {
        return Err(ForecastError::InsufficientHistoryError {
            required,
            available: history.len(),
        });
    }

    let window: Vec<f64> = history[history.len() - required..]
        .iter()
        .map(|v| v * policy.scale)
        .collect();

    let raw = model.infer(&window)?;
    if raw.len() != model.output_width() {
        return Err(ForecastError::ModelError(format!(
            "model '{}' returned {} values, declared {}",
            model.name(),
            raw.len(),
            model.output_width()
        )));
    }

    Ok(policy.finish(raw))
}
