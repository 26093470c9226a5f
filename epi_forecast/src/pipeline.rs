//! End-to-end run context
//!
//! A [`Pipeline`] owns the configuration and the loaded models for one
//! invocation. Every call takes the region data explicitly; nothing is cached
//! between calls.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use epi_math::WindowSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, RateStrategy};
use crate::data::{DataLoader, IngestReport, RegionSeries};
use crate::error::{ForecastError, Result};
use crate::features::Feature;
use crate::metrics::{validate_on_windows, ErrorMetrics};
use crate::models::{Forecaster, ModelSet};
use crate::predictors::{predict_auxiliary, predict_direct, predict_iterative};
use crate::trend::{current_trends, RegionTrends};
use crate::utils::future_dates;

/// Forecasts of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub region: String,
    pub horizon: usize,
    /// Calendar date of each forecast step
    pub dates: Vec<NaiveDate>,
    /// Positivity-rate forecast, absent when it failed
    pub rate: Option<Vec<f64>>,
    /// Count forecasts of the auxiliary features that succeeded
    pub counts: BTreeMap<Feature, Vec<u64>>,
    /// Reason for every requested feature without a forecast
    pub failures: BTreeMap<Feature, String>,
}

impl ForecastResult {
    /// True when every requested feature was forecast
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Configuration plus loaded models for one run
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: DataLoader,
    models: ModelSet,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, models: ModelSet) -> Self {
        if let Ok(rate) = models.rate() {
            if rate.required_window_length() != config.windows.rate_window {
                warn!(
                    configured = config.windows.rate_window,
                    model = rate.required_window_length(),
                    "rate window differs from model input length; predictions use the model's"
                );
            }
        }

        Self {
            loader: DataLoader::new(config.data.clone()),
            config,
            models,
        }
    }

    /// Load the models named in `config` and build a pipeline
    pub fn from_config(config: PipelineConfig) -> Self {
        let models = ModelSet::load(&config.models);
        Self::new(config, models)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    /// Load and clean every region below `dir`
    pub fn ingest<P: AsRef<Path>>(&self, dir: P) -> Result<IngestReport> {
        self.loader.load_directory(dir)
    }

    /// Trend summaries of every region that has enough samples
    pub fn trends(&self, regions: &[RegionSeries]) -> BTreeMap<String, RegionTrends> {
        current_trends(regions, self.config.windows.trend_window)
    }

    /// `(window, next value)` pairs of the positivity rate at the configured window
    pub fn rate_windows(&self, series: &RegionSeries) -> Result<WindowSet> {
        series.windows(Feature::TruePositive, self.config.windows.rate_window)
    }

    /// Positivity-rate forecast for `horizon` days using the configured strategy
    pub fn forecast_rate(&self, series: &RegionSeries, horizon: usize) -> Result<Vec<f64>> {
        let model = self.models.rate()?;
        let seed = series.seed(Feature::TruePositive, model.required_window_length())?;

        match self.config.forecast.strategy {
            RateStrategy::Direct => {
                let mut values = predict_direct(model.as_ref(), &seed)?;
                if horizon > values.len() {
                    return Err(ForecastError::InvalidParameter(format!(
                        "horizon {} exceeds rate model output width {}; use the iterative strategy",
                        horizon,
                        values.len()
                    )));
                }
                values.truncate(horizon);
                Ok(values)
            }
            RateStrategy::Iterative => predict_iterative(model.as_ref(), &seed, horizon),
        }
    }

    /// Rate and count forecasts of one region.
    ///
    /// Failures are recorded per feature so one unusable model does not hide
    /// the others.
    pub fn forecast_region(&self, series: &RegionSeries, horizon: usize) -> ForecastResult {
        let dates = series
            .last_date()
            .map(|last| future_dates(last, horizon))
            .unwrap_or_default();

        let mut failures = BTreeMap::new();
        let rate = match self.forecast_rate(series, horizon) {
            Ok(values) => Some(values),
            Err(e) => {
                warn!(region = series.name(), error = %e, "rate forecast unavailable");
                failures.insert(Feature::TruePositive, e.to_string());
                None
            }
        };

        let auxiliary = predict_auxiliary(&self.models, series, Some(horizon));
        failures.extend(auxiliary.failures);

        ForecastResult {
            region: series.name().to_string(),
            horizon,
            dates,
            rate,
            counts: auxiliary.counts,
            failures,
        }
    }

    /// Forecasts of every region, keyed by region name
    pub fn forecast_all(
        &self,
        regions: &[RegionSeries],
        horizon: usize,
    ) -> BTreeMap<String, ForecastResult> {
        let mut forecasts = BTreeMap::new();
        for series in regions {
            debug!(region = series.name(), horizon, "forecasting");
            let result = self.forecast_region(series, horizon);
            if forecasts.insert(series.name().to_string(), result).is_some() {
                warn!(region = series.name(), "duplicate region name, keeping the later file");
            }
        }

        let complete = forecasts.values().filter(|f| f.is_complete()).count();
        info!(regions = forecasts.len(), complete, horizon, "forecasting finished");
        forecasts
    }

    /// Score the rate model's one-step predictions over a region's history
    pub fn validate_region(&self, series: &RegionSeries) -> Result<ErrorMetrics> {
        let model = self.models.rate()?;
        let windows = series.windows(Feature::TruePositive, model.required_window_length())?;
        validate_on_windows(model.as_ref(), &windows)
    }
}
