//! # Epi Forecast
//!
//! Positivity-rate trends and forecasts for per-region daily counts.
//!
//! ## Features
//!
//! - Ingestion of per-region CSV files into validated, oldest-first series
//! - Positivity rate (`cases / tests`, zero when no tests were taken)
//! - Sliding-window datasets over any feature
//! - 14-day least-squares trend summaries
//! - Direct and autoregressive forecasts from pre-trained model artifacts
//! - Count forecasts for Cases, Deaths and Tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use epi_forecast::{Pipeline, PipelineConfig};
//!
//! let mut config = PipelineConfig::default();
//! config.models.rate = Some("models/rate.json".into());
//!
//! let pipeline = Pipeline::from_config(config);
//! let report = pipeline.ingest("county_data")?;
//!
//! let trends = pipeline.trends(&report.regions);
//! let forecasts = pipeline.forecast_all(&report.regions, 30);
//! # Ok::<(), epi_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod predictors;
pub mod trend;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{PipelineConfig, RateStrategy};
pub use crate::data::{DailyRecord, DataLoader, IngestReport, RegionSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::features::Feature;
pub use crate::models::{Forecaster, ModelArtifact, ModelMetadata, ModelSet, Postprocess};
pub use crate::pipeline::{ForecastResult, Pipeline};
pub use crate::trend::{RegionTrends, TrendSummary};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
