//! Pipeline configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canonical window length fed to the rate model
pub const DEFAULT_RATE_WINDOW: usize = 50;

/// Number of most recent samples used for the trend slope
pub const DEFAULT_TREND_WINDOW: usize = 14;

/// Row index (after cleaning) holding the region display name
pub const DEFAULT_REGION_NAME_ROW: usize = 5;

/// Top-level configuration for a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source file discovery and schema
    pub data: DataConfig,

    /// Window lengths
    pub windows: WindowConfig,

    /// Model artifact locations
    pub models: ModelPaths,

    /// Forecast defaults
    pub forecast: ForecastConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Source file discovery and schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// File extension accepted by the directory scan, without the dot
    pub extension: String,

    /// Files smaller than this many bytes are treated as placeholders
    pub min_file_bytes: u64,

    /// Maximum directory depth visited below the data root
    pub max_depth: usize,

    /// Maximum number of candidate files considered per scan
    pub max_files: usize,

    /// Leading columns that carry area metadata rather than counts
    pub metadata_columns: usize,

    /// Cleaned row whose area name labels the region
    pub region_name_row: usize,

    /// Named source columns
    pub columns: SourceColumns,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            extension: "csv".to_string(),
            min_file_bytes: 64,
            max_depth: 4,
            max_files: 4096,
            metadata_columns: 3,
            region_name_row: DEFAULT_REGION_NAME_ROW,
            columns: SourceColumns::default(),
        }
    }
}

/// Header names of the columns read from each source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceColumns {
    pub area_name: String,
    pub date: String,
    pub cases: String,
    pub deaths: String,
    pub tests: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            area_name: "areaName".to_string(),
            date: "date".to_string(),
            cases: "newCasesBySpecimenDate".to_string(),
            deaths: "newDeaths28DaysByDeathDate".to_string(),
            tests: "newVirusTestsBySpecimenDate".to_string(),
        }
    }
}

/// Window lengths shared by windowing and trend estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Input length of the positivity-rate model
    pub rate_window: usize,

    /// Samples used for the trend slope
    pub trend_window: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            rate_window: DEFAULT_RATE_WINDOW,
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

/// Paths of the serialized model artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    /// Positivity-rate model
    pub rate: Option<PathBuf>,
    pub cases: Option<PathBuf>,
    pub deaths: Option<PathBuf>,
    pub tests: Option<PathBuf>,
}

/// How the positivity-rate forecast is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStrategy {
    /// One model call; horizon limited to the model's output width
    Direct,
    /// Autoregressive rollout of single-step calls; any horizon
    #[default]
    Iterative,
}

/// Forecast defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Days requested when the caller gives no horizon
    pub horizon: usize,

    pub strategy: RateStrategy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 30,
            strategy: RateStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [windows]
            rate_window = 100

            [forecast]
            strategy = "direct"
            "#,
        )
        .unwrap();

        assert_eq!(config.windows.rate_window, 100);
        assert_eq!(config.windows.trend_window, DEFAULT_TREND_WINDOW);
        assert_eq!(config.forecast.strategy, RateStrategy::Direct);
        assert_eq!(config.forecast.horizon, 30);
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let mut config = PipelineConfig::default();
        config.models.rate = Some(PathBuf::from("models/rate.json"));

        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = PipelineConfig::from_toml_str("windows = [").unwrap_err();
        assert!(matches!(err, crate::error::ForecastError::ConfigError(_)));
    }
}
