//! Error types for the epi_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the epi_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Source file has missing, unexpected or malformed columns
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Source file yields no usable rows after cleaning
    #[error("Empty input: {0}")]
    EmptyInputError(String),

    /// Too few samples for the trend window
    #[error("Insufficient data: need {required} samples, got {available}")]
    InsufficientDataError { required: usize, available: usize },

    /// Forecast seed shorter than the model's input window
    #[error("Insufficient history: model needs {required} values, got {available}")]
    InsufficientHistoryError { required: usize, available: usize },

    /// Model artifact missing, unreadable or inconsistent
    #[error("Model load error: {0}")]
    ModelLoadError(String),

    /// Positional lookup past the end of the cleaned rows
    #[error("Index {index} out of range for {len} rows")]
    IndexOutOfRangeError { index: usize, len: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error raised while running a loaded model
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error while reading or writing configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error while encoding or decoding JSON
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Error from the numeric primitives
    #[error("Math error: {0}")]
    MathError(#[from] epi_math::MathError),
}

impl ForecastError {
    /// Errors that exclude a single file during ingestion rather than
    /// aborting the run.
    pub fn is_file_local(&self) -> bool {
        matches!(
            self,
            ForecastError::SchemaError(_)
                | ForecastError::EmptyInputError(_)
                | ForecastError::IndexOutOfRangeError { .. }
                | ForecastError::CsvError(_)
                | ForecastError::IoError(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for ForecastError {
    fn from(err: toml::ser::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
