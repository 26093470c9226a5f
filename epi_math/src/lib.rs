//! # Epi Math
//!
//! Numerical building blocks for daily epidemiological series.
//! This crate provides sliding-window dataset construction and the
//! least-squares trend fit used to summarise recent movement of a feature.

use thiserror::Error;

pub mod regression;
pub mod windowing;

pub use regression::{linear_fit, mean, round_to, LinearFit};
pub use windowing::{last_window, sliding_windows, WindowSet};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: need {required}, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
