//! Region series ingestion and cleaning
//!
//! Source files are delimited tables, newest day first, with a header row,
//! a few leading area-metadata columns and one column each for date, cases,
//! deaths and tests. Loading a file drops incomplete rows, reads the region
//! name from a fixed cleaned row, reverses to oldest-first order and derives
//! the positivity rate.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use epi_math::{last_window, sliding_windows, MathError, WindowSet};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{ForecastError, Result};
use crate::features::{positivity_rate, Feature};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One day of counts for a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub cases: u64,
    pub deaths: u64,
    pub tests: u64,
    /// Derived from `cases` and `tests`, see [`positivity_rate`]
    pub true_positive: f64,
}

impl DailyRecord {
    /// Build a record, deriving the positivity rate from the counts
    pub fn new(date: NaiveDate, cases: u64, deaths: u64, tests: u64) -> Self {
        Self {
            date,
            cases,
            deaths,
            tests,
            true_positive: positivity_rate(cases, tests),
        }
    }

    /// Value of a feature channel
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Cases => self.cases as f64,
            Feature::Deaths => self.deaths as f64,
            Feature::Tests => self.tests as f64,
            Feature::TruePositive => self.true_positive,
        }
    }
}

/// Chronologically ordered daily records of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeries {
    name: String,
    records: Vec<DailyRecord>,
}

impl RegionSeries {
    /// Create a series, checking ordering and the positivity invariant
    pub fn new(name: impl Into<String>, records: Vec<DailyRecord>) -> Result<Self> {
        let name = name.into();
        if records.is_empty() {
            return Err(ForecastError::EmptyInputError(format!(
                "region '{}' has no records",
                name
            )));
        }

        if let Some(pair) = records.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(ForecastError::SchemaError(format!(
                "region '{}' is not in ascending date order at {}",
                name, pair[1].date
            )));
        }

        for record in &records {
            let in_range = (0.0..=1.0).contains(&record.true_positive);
            if !in_range || (record.tests == 0 && record.true_positive != 0.0) {
                return Err(ForecastError::SchemaError(format!(
                    "region '{}' has invalid positivity rate {} on {}",
                    name, record.true_positive, record.date
                )));
            }
        }

        Ok(Self { name, records })
    }

    /// Build a series from `(date, cases, deaths, tests)` rows in any order
    pub fn from_counts(
        name: impl Into<String>,
        mut rows: Vec<(NaiveDate, u64, u64, u64)>,
    ) -> Result<Self> {
        rows.sort_by_key(|row| row.0);
        let records = rows
            .into_iter()
            .map(|(date, cases, deaths, tests)| DailyRecord::new(date, cases, deaths, tests))
            .collect();
        Self::new(name, records)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Date of the most recent record
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Values of one feature channel, oldest first
    pub fn values(&self, feature: Feature) -> Vec<f64> {
        self.records.iter().map(|r| r.value(feature)).collect()
    }

    /// `(window, next value)` pairs over one feature channel
    pub fn windows(&self, feature: Feature, window: usize) -> Result<WindowSet> {
        Ok(sliding_windows(&self.values(feature), window)?)
    }

    /// The last `window` values of a feature, used to seed a forecast
    pub fn seed(&self, feature: Feature, window: usize) -> Result<Vec<f64>> {
        let values = self.values(feature);
        match last_window(&values, window) {
            Ok(seed) => Ok(seed.to_vec()),
            Err(MathError::InsufficientData {
                required,
                available,
            }) => Err(ForecastError::InsufficientHistoryError {
                required,
                available,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Canonical columns as a DataFrame
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let dates: Vec<String> = self
            .records
            .iter()
            .map(|r| r.date.format(DATE_FORMAT).to_string())
            .collect();
        let cases: Vec<u64> = self.records.iter().map(|r| r.cases).collect();
        let deaths: Vec<u64> = self.records.iter().map(|r| r.deaths).collect();
        let tests: Vec<u64> = self.records.iter().map(|r| r.tests).collect();

        let df = DataFrame::new(vec![
            Series::new("Date", dates),
            Series::new(Feature::Cases.as_str(), cases),
            Series::new(Feature::Deaths.as_str(), deaths),
            Series::new(Feature::Tests.as_str(), tests),
            Series::new(
                Feature::TruePositive.as_str(),
                self.values(Feature::TruePositive),
            ),
        ])?;

        Ok(df)
    }

    /// Write the canonical columns to a CSV file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
        Ok(())
    }
}

/// A file left out of an ingestion run
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: ForecastError,
}

/// Outcome of loading a data directory
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Successfully cleaned regions, in file discovery order
    pub regions: Vec<RegionSeries>,
    /// Files that produced no region
    pub skipped: Vec<SkippedFile>,
}

/// Column positions resolved from a file header
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    width: usize,
    area_name: usize,
    date: usize,
    cases: usize,
    deaths: usize,
    tests: usize,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord, config: &DataConfig) -> Result<Self> {
        let expected = config.metadata_columns + 4;
        if headers.len() != expected {
            return Err(ForecastError::SchemaError(format!(
                "expected {} columns, found {}",
                expected,
                headers.len()
            )));
        }

        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ForecastError::SchemaError(format!("missing column '{}'", name)))
        };

        let columns = &config.columns;
        let layout = Self {
            width: headers.len(),
            area_name: find(&columns.area_name)?,
            date: find(&columns.date)?,
            cases: find(&columns.cases)?,
            deaths: find(&columns.deaths)?,
            tests: find(&columns.tests)?,
        };

        if layout.area_name >= config.metadata_columns {
            return Err(ForecastError::SchemaError(format!(
                "column '{}' must be one of the leading {} metadata columns",
                columns.area_name, config.metadata_columns
            )));
        }
        let data = [layout.date, layout.cases, layout.deaths, layout.tests];
        if data.iter().any(|&i| i < config.metadata_columns) {
            return Err(ForecastError::SchemaError(
                "data columns overlap the metadata columns".to_string(),
            ));
        }

        Ok(layout)
    }
}

/// Loads region series from source files
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: DataConfig,
}

impl DataLoader {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Load every usable file below `root`.
    ///
    /// Files that fail to clean are recorded in the report and excluded;
    /// only an unreadable root is an error.
    pub fn load_directory<P: AsRef<Path>>(&self, root: P) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for path in self.discover(root.as_ref())? {
            match self.load_file(&path) {
                Ok(series) => {
                    debug!(region = series.name(), rows = series.len(), path = %path.display(), "loaded region");
                    report.regions.push(series);
                }
                Err(e) if e.is_file_local() => {
                    match &e {
                        ForecastError::EmptyInputError(_) => {
                            debug!(path = %path.display(), "no usable rows, skipping")
                        }
                        _ => warn!(path = %path.display(), error = %e, "skipping file"),
                    }
                    report.skipped.push(SkippedFile { path, reason: e });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            loaded = report.regions.len(),
            skipped = report.skipped.len(),
            "ingestion finished"
        );
        Ok(report)
    }

    /// Load one source file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<RegionSeries> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.parse_reader(file, &path.display().to_string())
    }

    /// Clean a source table read from `reader`; `source` labels errors
    pub fn parse_reader<R: Read>(&self, reader: R, source: &str) -> Result<RegionSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let layout = ColumnLayout::resolve(&headers, &self.config)
            .map_err(|e| with_source(e, source))?;

        // Rows with any missing field are dropped
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() == layout.width && record.iter().all(|field| !field.is_empty()) {
                rows.push(record);
            }
        }

        if rows.is_empty() {
            return Err(ForecastError::EmptyInputError(format!(
                "{}: no complete rows",
                source
            )));
        }

        let name_row = self.config.region_name_row;
        let name = rows
            .get(name_row)
            .map(|row| row[layout.area_name].to_string())
            .ok_or(ForecastError::IndexOutOfRangeError {
                index: name_row,
                len: rows.len(),
            })?;

        if let Some(other) = rows.iter().find(|row| row[layout.area_name] != name) {
            return Err(ForecastError::SchemaError(format!(
                "{}: area name changes from '{}' to '{}'",
                source,
                name,
                &other[layout.area_name]
            )));
        }

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let date = NaiveDate::parse_from_str(&row[layout.date], DATE_FORMAT).map_err(|e| {
                ForecastError::SchemaError(format!(
                    "{}: invalid date '{}': {}",
                    source, &row[layout.date], e
                ))
            })?;
            records.push(DailyRecord::new(
                date,
                parse_count(&row[layout.cases], source)?,
                parse_count(&row[layout.deaths], source)?,
                parse_count(&row[layout.tests], source)?,
            ));
        }

        // Sources are newest first
        records.reverse();
        if !records.windows(2).all(|w| w[0].date <= w[1].date) {
            debug!(source, "rows not newest-first, sorting by date");
            records.sort_by_key(|r| r.date);
        }

        RegionSeries::new(name, records).map_err(|e| with_source(e, source))
    }

    /// Candidate files below `root`, bounded by depth and count
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut pending = vec![(root.to_path_buf(), 0usize)];

        while let Some((dir, depth)) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if depth == 0 => return Err(e.into()),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "cannot read directory");
                    continue;
                }
            };

            let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
            paths.sort();

            for path in paths {
                if path.is_dir() {
                    if depth < self.config.max_depth {
                        pending.push((path, depth + 1));
                    }
                    continue;
                }
                if !self.accepts(&path) {
                    continue;
                }
                if found.len() >= self.config.max_files {
                    warn!(
                        limit = self.config.max_files,
                        "file limit reached, ignoring remaining files"
                    );
                    found.sort();
                    return Ok(found);
                }
                found.push(path);
            }
        }

        found.sort();
        Ok(found)
    }

    /// Extension and placeholder-size filter
    fn accepts(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(&self.config.extension));
        if !extension_matches {
            return false;
        }

        match fs::metadata(path) {
            Ok(meta) => meta.len() >= self.config.min_file_bytes,
            Err(_) => false,
        }
    }
}

fn parse_count(field: &str, source: &str) -> Result<u64> {
    let value: f64 = field.parse().map_err(|_| {
        ForecastError::SchemaError(format!("{}: non-numeric count '{}'", source, field))
    })?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(ForecastError::SchemaError(format!(
            "{}: invalid count '{}'",
            source, field
        )));
    }
    Ok(value as u64)
}

fn with_source(err: ForecastError, source: &str) -> ForecastError {
    match err {
        ForecastError::SchemaError(msg) => ForecastError::SchemaError(format!("{}: {}", source, msg)),
        other => other,
    }
}
