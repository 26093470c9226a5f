//! Count forecasts for the auxiliary features

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::data::RegionSeries;
use crate::error::{ForecastError, Result};
use crate::features::Feature;
use crate::models::{Forecaster, ModelSet, Postprocess};
use crate::predictors::direct::predict_with_policy;

/// Count forecasts of one region, keyed by feature.
///
/// A feature whose model is missing or whose prediction failed appears in
/// `failures` instead of `counts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuxiliaryForecast {
    pub counts: BTreeMap<Feature, Vec<u64>>,
    pub failures: BTreeMap<Feature, String>,
}

impl AuxiliaryForecast {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Predict whichever of Cases, Deaths and Tests have a configured model.
///
/// Each feature uses its own model and window length. Counts are fed to the
/// model unscaled, then rounded to whole counts and clipped at zero whatever
/// the model's own policy says.
/// With `horizon` set, each sequence is cut to that length and a model
/// whose output is shorter fails for its feature.
pub fn predict_auxiliary(
    models: &ModelSet,
    series: &RegionSeries,
    horizon: Option<usize>,
) -> AuxiliaryForecast {
    let mut forecast = AuxiliaryForecast::default();

    for feature in Feature::AUXILIARY {
        if !models.is_configured(feature) {
            continue;
        }
        match predict_counts(models, series, feature, horizon) {
            Ok(values) => {
                forecast.counts.insert(feature, values);
            }
            Err(e) => {
                warn!(region = series.name(), %feature, error = %e, "count forecast unavailable");
                forecast.failures.insert(feature, e.to_string());
            }
        }
    }

    forecast
}

fn predict_counts(
    models: &ModelSet,
    series: &RegionSeries,
    feature: Feature,
    horizon: Option<usize>,
) -> Result<Vec<u64>> {
    let model = models.get(feature)?;
    let seed = series.seed(feature, model.required_window_length())?;
    let mut values = predict_with_policy(model.as_ref(), &seed, Postprocess::counts())?;

    if let Some(horizon) = horizon {
        if horizon > values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "horizon {} exceeds {} model output width {}",
                horizon,
                feature,
                values.len()
            )));
        }
        values.truncate(horizon);
    }

    Ok(values.into_iter().map(|v| v as u64).collect())
}
