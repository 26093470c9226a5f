//! Utility functions for the epi_forecast crate

use chrono::{Days, NaiveDate};

/// Calendar days following `last`, one per forecast step
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u64)
        .map_while(|offset| last.checked_add_days(Days::new(offset)))
        .collect()
}

/// True when every value lies in `[0, 1]`
pub fn all_unit_interval(values: &[f64]) -> bool {
    values.iter().all(|v| (0.0..=1.0).contains(v))
}
