//! Forecast every region found in a data directory and print the result as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use epi_forecast::{ForecastResult, Pipeline, PipelineConfig, RateStrategy, RegionTrends};

/// Positivity-rate trends and forecasts per region
#[derive(Parser, Debug)]
#[command(name = "forecast_regions")]
#[command(version)]
#[command(about = "Trend summaries and forecasts for per-region daily counts", long_about = None)]
struct Args {
    /// Directory holding the per-region CSV files
    data_dir: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Days to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Forecast the rate with one model call instead of a rollout
    #[arg(long)]
    direct: bool,

    /// Rate model artifact, overriding the configuration
    #[arg(long)]
    rate_model: Option<PathBuf>,

    /// Write each cleaned region series as CSV into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report {
    trends: BTreeMap<String, RegionTrends>,
    forecasts: BTreeMap<String, ForecastResult>,
    skipped: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(path) = args.rate_model {
        config.models.rate = Some(path);
    }
    if args.direct {
        config.forecast.strategy = RateStrategy::Direct;
    }
    let horizon = args.horizon.unwrap_or(config.forecast.horizon);

    let pipeline = Pipeline::from_config(config);
    let ingest = pipeline
        .ingest(&args.data_dir)
        .with_context(|| format!("scanning {}", args.data_dir.display()))?;

    if let Some(dir) = &args.export_dir {
        fs::create_dir_all(dir)?;
        for series in &ingest.regions {
            let path = dir.join(format!("{}.csv", series.name().replace('/', "_")));
            series
                .write_csv(&path)
                .with_context(|| format!("exporting {}", path.display()))?;
        }
        tracing::info!(dir = %dir.display(), regions = ingest.regions.len(), "exported cleaned series");
    }

    let report = Report {
        trends: pipeline.trends(&ingest.regions),
        forecasts: pipeline.forecast_all(&ingest.regions, horizon),
        skipped: ingest
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.path.display(), s.reason))
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
