//! Per-record feature channels and positivity-rate derivation

use std::fmt;

use serde::{Deserialize, Serialize};

/// A feature channel of a region's series
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    Cases,
    Deaths,
    Tests,
    #[serde(rename = "True_Positive")]
    TruePositive,
}

impl Feature {
    /// Every channel, in canonical column order
    pub const ALL: [Feature; 4] = [
        Feature::Cases,
        Feature::Deaths,
        Feature::Tests,
        Feature::TruePositive,
    ];

    /// Count channels forecast by the auxiliary predictor
    pub const AUXILIARY: [Feature; 3] = [Feature::Cases, Feature::Deaths, Feature::Tests];

    /// Canonical column name
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Cases => "Cases",
            Feature::Deaths => "Deaths",
            Feature::Tests => "Tests",
            Feature::TruePositive => "True_Positive",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of tests that returned positive.
///
/// Zero whenever no tests were recorded, and bounded to `[0, 1]` so that
/// reporting artefacts with more cases than tests cannot leave the signal's
/// range.
pub fn positivity_rate(cases: u64, tests: u64) -> f64 {
    if tests == 0 {
        return 0.0;
    }
    (cases as f64 / tests as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tests_gives_zero_rate() {
        assert_eq!(positivity_rate(5, 0), 0.0);
        assert_eq!(positivity_rate(0, 0), 0.0);
    }

    #[test]
    fn rate_is_cases_over_tests() {
        assert_eq!(positivity_rate(25, 100), 0.25);
        assert_eq!(positivity_rate(3, 3), 1.0);
    }

    #[test]
    fn rate_never_exceeds_one() {
        assert_eq!(positivity_rate(12, 10), 1.0);
    }

    #[test]
    fn feature_names_match_columns() {
        let names: Vec<_> = Feature::ALL.iter().map(Feature::as_str).collect();
        assert_eq!(names, ["Cases", "Deaths", "Tests", "True_Positive"]);
        assert_eq!(
            serde_json::to_string(&Feature::TruePositive).unwrap(),
            "\"True_Positive\""
        );
    }
}
