//! Row filters for provider tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single table cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell; text is parsed when it holds a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Filter applied to a column of a provider table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFilter {
    /// Inclusive range; a missing bound is open
    NumericRange { min: Option<f64>, max: Option<f64> },
    /// Case-insensitive substring match
    TextContains { needle: String },
}

impl RowFilter {
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::NumericRange { min, max }
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Self::TextContains {
            needle: needle.into(),
        }
    }

    /// Check if the value passes this filter
    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            Self::NumericRange { min, max } => {
                let Some(n) = value.as_number() else {
                    return false;
                };
                if n.is_nan() {
                    return false;
                }
                min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)
            }
            Self::TextContains { needle } => value
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }

    /// Check if the value passes every filter
    pub fn matches_all(filters: &[RowFilter], value: &CellValue) -> bool {
        filters.iter().all(|f| f.matches(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_range_inclusive() {
        let filter = RowFilter::range(Some(1.0), Some(5.0));
        assert!(filter.matches(&1.0.into()));
        assert!(filter.matches(&5.0.into()));
        assert!(!filter.matches(&5.01.into()));
    }

    #[test]
    fn test_numeric_range_open_bounds() {
        assert!(RowFilter::range(None, Some(0.0)).matches(&(-100.0).into()));
        assert!(RowFilter::range(Some(0.0), None).matches(&1e9.into()));
        assert!(RowFilter::range(None, None).matches(&0.0.into()));
    }

    #[test]
    fn test_numeric_range_parses_text() {
        let filter = RowFilter::range(Some(10.0), None);
        assert!(filter.matches(&" 12.5 ".into()));
        assert!(!filter.matches(&"n/a".into()));
        assert!(!filter.matches(&f64::NAN.into()));
    }

    #[test]
    fn test_text_contains() {
        let filter = RowFilter::contains("gold");
        assert!(filter.matches(&"GoldRush Signals".into()));
        assert!(!filter.matches(&"Silver".into()));
        assert!(RowFilter::contains("12.5").matches(&12.5.into()));
    }

    #[test]
    fn test_matches_all() {
        let filters = vec![RowFilter::range(Some(0.0), Some(100.0)), RowFilter::contains("5")];
        assert!(RowFilter::matches_all(&filters, &55.0.into()));
        assert!(!RowFilter::matches_all(&filters, &44.0.into()));
    }

    #[test]
    fn test_filter_serde() {
        let json = r#"{"kind":"numeric_range","min":1.0,"max":null}"#;
        let filter: RowFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter, RowFilter::range(Some(1.0), None));
    }
}
