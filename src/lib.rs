//! # Covid Predictor
//!
//! `covid_predictor` bundles the workspace crates behind one dependency:
//! [`epi_forecast`] for ingestion, trends and model-driven forecasts, and
//! [`epi_math`] for the windowing and regression primitives underneath.
//!
//! ## Example
//!
//! ```
//! use covid_predictor::prelude::*;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let rows = (0..20u64)
//!     .map(|i| (start + chrono::Days::new(i), i, 0, 100))
//!     .collect();
//! let series = RegionSeries::from_counts("Testville", rows).unwrap();
//!
//! let windows = series.windows(Feature::TruePositive, 14).unwrap();
//! assert_eq!(windows.len(), 6);
//!
//! let trend = trend_summary(&series.values(Feature::Cases), 14).unwrap();
//! assert_eq!(trend.slope, 1.0);
//! ```

pub use epi_forecast;
pub use epi_math;

/// Commonly used types from both crates
pub mod prelude {
    pub use epi_forecast::predictors::{predict_auxiliary, predict_direct, predict_iterative};
    pub use epi_forecast::trend::{current_trends, trend_summary};
    pub use epi_forecast::{
        DataLoader, Feature, ForecastError, ForecastResult, Forecaster, ModelArtifact,
        ModelMetadata, ModelSet, Pipeline, PipelineConfig, RegionSeries, TrendSummary,
    };
    pub use epi_math::{sliding_windows, WindowSet};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_exposes_windowing() {
        let set = sliding_windows(&[0.1, 0.2, 0.3], 2).unwrap();
        assert_eq!(set.labels(), &[0.3]);
    }
}
