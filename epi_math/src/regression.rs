//! Least-squares trend fitting
//!
//! The fit uses positional x values `0..n`, so the slope is expressed in
//! units of the feature per sample.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Parameters of a degree-1 polynomial fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Value of the fitted line at position `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares line through `(i, values[i])`.
pub fn linear_fit(values: &[f64]) -> Result<LinearFit> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData {
            required: 2,
            available: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Values must be finite for a linear fit".to_string(),
        ));
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator.abs() < 1e-10 {
        return Err(MathError::CalculationError(
            "Cannot calculate slope: x values are too similar".to_string(),
        ));
    }

    let slope = numerator / denominator;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Arithmetic mean of a non-empty slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData {
            required: 1,
            available: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to `decimals` places, ties to the even neighbour
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        2.0 * (scaled / 2.0).round()
    } else {
        scaled.round()
    };
    rounded / factor
}
