//! Sliding-window dataset construction
//!
//! A series of length `L` cut with window `W` produces `max(0, L - W)`
//! pairs. Pair `i` holds `values[i..i + W]` as input and `values[i + W]`
//! as its label.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Input windows paired with the value that follows each of them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSet {
    /// Window length every input row shares
    window: usize,
    /// One row of `window` consecutive values per pair
    inputs: Vec<Vec<f64>>,
    /// Value immediately following the matching input row
    labels: Vec<f64>,
}

impl WindowSet {
    /// Window length used to build the set
    pub fn window(&self) -> usize {
        self.window
    }

    /// Input rows (`X`)
    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    /// Labels (`y`)
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the series was too short to produce any pair
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Most recent input row, if any pair exists
    pub fn last_input(&self) -> Option<&[f64]> {
        self.inputs.last().map(Vec::as_slice)
    }

    /// Iterate over `(input, label)` pairs in chronological order
    pub fn pairs(&self) -> impl Iterator<Item = (&[f64], f64)> + '_ {
        self.inputs
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().copied())
    }
}

/// Slice `values` into `(window, next value)` pairs.
///
/// Returns an empty set when `values.len() <= window`.
pub fn sliding_windows(values: &[f64], window: usize) -> Result<WindowSet> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window length must be positive".to_string(),
        ));
    }

    let count = values.len().saturating_sub(window);
    let mut inputs = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);

    for start in 0..count {
        inputs.push(values[start..start + window].to_vec());
        labels.push(values[start + window]);
    }

    Ok(WindowSet {
        window,
        inputs,
        labels,
    })
}

/// The last `window` values of the series, used as a forecast seed.
pub fn last_window(values: &[f64], window: usize) -> Result<&[f64]> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window length must be positive".to_string(),
        ));
    }
    if values.len() < window {
        return Err(MathError::InsufficientData {
            required: window,
            available: values.len(),
        });
    }

    Ok(&values[values.len() - window..])
}
