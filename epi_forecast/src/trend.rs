//! Short-window trend summaries
//!
//! A summary holds the least-squares slope over the most recent samples and
//! the mean over the whole series. Series shorter than the trend window are
//! rejected with `InsufficientDataError` rather than fitted on fewer points.

use std::collections::BTreeMap;

use epi_math::{linear_fit, mean, round_to};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::RegionSeries;
use crate::error::{ForecastError, Result};
use crate::features::Feature;

/// Slope decimals kept in a summary
const SLOPE_DECIMALS: u32 = 4;
/// Mean decimals kept in a summary
const MEAN_DECIMALS: u32 = 2;

/// Recent slope and overall mean of one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub slope: f64,
    pub mean: f64,
}

/// Trend summaries of one region, keyed by feature
pub type RegionTrends = BTreeMap<Feature, TrendSummary>;

/// Summarise `values` using the last `window` samples for the slope
pub fn trend_summary(values: &[f64], window: usize) -> Result<TrendSummary> {
    if window < 2 {
        return Err(ForecastError::InvalidParameter(format!(
            "trend window must be at least 2, got {}",
            window
        )));
    }
    if values.len() < window {
        return Err(ForecastError::InsufficientDataError {
            required: window,
            available: values.len(),
        });
    }

    let fit = linear_fit(&values[values.len() - window..])?;
    Ok(TrendSummary {
        slope: round_to(fit.slope, SLOPE_DECIMALS),
        mean: round_to(mean(values)?, MEAN_DECIMALS),
    })
}

/// Summaries of every feature of one region
pub fn region_trends(series: &RegionSeries, window: usize) -> Result<RegionTrends> {
    Feature::ALL
        .iter()
        .map(|&feature| trend_summary(&series.values(feature), window).map(|s| (feature, s)))
        .collect()
}

/// Summaries of every region; regions that cannot be summarised are left out
pub fn current_trends(regions: &[RegionSeries], window: usize) -> BTreeMap<String, RegionTrends> {
    let mut trends = BTreeMap::new();
    for series in regions {
        match region_trends(series, window) {
            Ok(summary) => {
                if trends.insert(series.name().to_string(), summary).is_some() {
                    warn!(region = series.name(), "duplicate region name, keeping the later file");
                }
            }
            Err(e) => warn!(region = series.name(), error = %e, "no trend summary"),
        }
    }
    trends
}
