//! Autoregressive rollout
//!
//! Each step feeds the model its own earlier predictions as if they were
//! observations, so forecast error compounds as the horizon grows. That
//! degradation is inherent to a one-step-ahead model.

use tracing::trace;

use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::predictors::direct::predict_direct;

/// Extend `seed` by `horizon` single-step predictions.
///
/// Every step runs [`predict_direct`] on the last `required_window_length`
/// values of the growing timeline and appends the first output value.
/// Returns only the appended values.
pub fn predict_iterative(model: &dyn Forecaster, seed: &[f64], horizon: usize) -> Result<Vec<f64>> {
    let required = model.required_window_length();
    if seed.len() < required {
        return Err(ForecastError::InsufficientHistoryError {
            required,
            available: seed.len(),
        });
    }

    let mut timeline = seed.to_vec();

    for step in 0..horizon {
        let next = predict_direct(model, &timeline)?
            .first()
            .copied()
            .ok_or_else(|| {
                ForecastError::ModelError(format!("model '{}' returned no values", model.name()))
            })?;
        trace!(step, value = next, "rollout step");
        timeline.push(next);
    }

    Ok(timeline.split_off(seed.len()))
}
