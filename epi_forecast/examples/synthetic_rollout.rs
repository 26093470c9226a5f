//! Roll a persistence-style rate model forward over a synthetic region.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use epi_forecast::models::{LinearModel, ModelMetadata, ModelSet, Postprocess};
use epi_forecast::{Feature, Pipeline, PipelineConfig, RegionSeries};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2020, 9, 1).ok_or("bad start date")?;

    // Slowly rising positivity with a weekly testing dip
    let rows = (0..90u64)
        .map(|i| {
            let tests = if i % 7 == 6 { 400 } else { 1000 };
            let cases = tests * (20 + i) / 1000;
            (start + Days::new(i), cases, i / 30, tests)
        })
        .collect();
    let series = RegionSeries::from_counts("Synthetic", rows)?;

    // Average of the last week, trained on inputs scaled by 1000
    let mut weights = vec![0.0; 50];
    for w in weights.iter_mut().skip(43) {
        *w = 1.0 / 7.0;
    }
    let model = LinearModel::new(
        ModelMetadata::new("weekly-mean", 50, 1).with_postprocess(Postprocess::scaled(1000.0)),
        vec![weights],
        vec![0.0],
    )?;

    let models = ModelSet::new().with_model(Feature::TruePositive, Arc::new(model));
    let pipeline = Pipeline::new(PipelineConfig::default(), models);

    let trends = pipeline.trends(std::slice::from_ref(&series));
    println!("Trends: {:?}", trends["Synthetic"]);

    let forecast = pipeline.forecast_region(&series, 14);
    if let Some(rate) = &forecast.rate {
        for (date, value) in forecast.dates.iter().zip(rate) {
            println!("{}  {:.4}", date, value);
        }
    }

    let metrics = pipeline.validate_region(&series)?;
    println!("{}", metrics);

    Ok(())
}
