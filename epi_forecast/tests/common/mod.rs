#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use epi_forecast::models::{Forecaster, LinearModel, ModelArtifact, ModelMetadata};
use epi_forecast::{ForecastError, RegionSeries};

pub const HEADER: &str = "areaCode,areaName,areaType,date,newCasesBySpecimenDate,newDeaths28DaysByDeathDate,newVirusTestsBySpecimenDate";

pub fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 9, 1).unwrap() + Days::new(offset)
}

/// `(cases, deaths, tests)` per day, oldest first
pub type Counts = (u64, u64, u64);

/// CSV text in source order (newest first)
pub fn region_csv(name: &str, counts: &[Counts]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for (i, (cases, deaths, tests)) in counts.iter().enumerate().rev() {
        text.push_str(&format!(
            "E0600001,{},ltla,{},{},{},{}\n",
            name,
            day(i as u64),
            cases,
            deaths,
            tests
        ));
    }
    text
}

pub fn write_region(dir: &Path, file: &str, name: &str, counts: &[Counts]) -> PathBuf {
    let path = dir.join(file);
    let mut out = fs::File::create(&path).unwrap();
    out.write_all(region_csv(name, counts).as_bytes()).unwrap();
    path
}

/// 70 days, 100 tests a day, cases ramping 0..69
pub fn testville_counts() -> Vec<Counts> {
    (0..70).map(|i| (i, i % 3, 100)).collect()
}

pub fn testville() -> RegionSeries {
    let rows = testville_counts()
        .into_iter()
        .enumerate()
        .map(|(i, (c, d, t))| (day(i as u64), c, d, t))
        .collect();
    RegionSeries::from_counts("Testville", rows).unwrap()
}

/// Linear model copying the last input to every output
pub fn last_value_linear(input_len: usize, output_width: usize) -> LinearModel {
    LinearModel::selector(
        ModelMetadata::new("last-value", input_len, output_width),
        input_len - 1,
    )
    .unwrap()
}

pub fn write_model(dir: &Path, file: &str, artifact: &ModelArtifact) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, artifact.to_json().unwrap()).unwrap();
    path
}

/// Forecaster returning fixed values, whatever the input
#[derive(Debug)]
pub struct Constant {
    pub metadata: ModelMetadata,
    pub value: f64,
}

impl Forecaster for Constant {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn infer(&self, window: &[f64]) -> Result<Vec<f64>, ForecastError> {
        assert_eq!(window.len(), self.metadata.input_len);
        Ok(vec![self.value; self.metadata.output_width])
    }
}

pub fn constant(input_len: usize, output_width: usize, value: f64) -> Arc<dyn Forecaster> {
    Arc::new(Constant {
        metadata: ModelMetadata::new("constant", input_len, output_width),
        value,
    })
}
