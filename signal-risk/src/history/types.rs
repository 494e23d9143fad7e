//! Stat history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by history backends
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history backend error: {0}")]
    Backend(String),
    #[error("unknown stat type tag `{0}`")]
    UnknownStatType(String),
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Kind of stat persisted per provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Mpdd3,
    Mpdd6,
    Mpdd9,
    Mpdd12,
    WinRate,
    ProfitFactor,
    TotalProfit,
    MaxDrawdown,
}

impl StatType {
    pub const ALL: [StatType; 8] = [
        StatType::Mpdd3,
        StatType::Mpdd6,
        StatType::Mpdd9,
        StatType::Mpdd12,
        StatType::WinRate,
        StatType::ProfitFactor,
        StatType::TotalProfit,
        StatType::MaxDrawdown,
    ];

    /// Stat type for an MPDD window, `None` for non-standard windows
    pub fn mpdd(months: usize) -> Option<Self> {
        match months {
            3 => Some(Self::Mpdd3),
            6 => Some(Self::Mpdd6),
            9 => Some(Self::Mpdd9),
            12 => Some(Self::Mpdd12),
            _ => None,
        }
    }

    /// Tag stored alongside persisted values
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Mpdd3 => "MPDD3",
            Self::Mpdd6 => "MPDD6",
            Self::Mpdd9 => "MPDD9",
            Self::Mpdd12 => "MPDD12",
            Self::WinRate => "WIN_RATE",
            Self::ProfitFactor => "PROFIT_FACTOR",
            Self::TotalProfit => "TOTAL_PROFIT",
            Self::MaxDrawdown => "MAX_DRAWDOWN",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for StatType {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.tag() == s)
            .ok_or_else(|| HistoryError::UnknownStatType(s.to_string()))
    }
}

/// Identifies one time series: a provider and a stat type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatKey {
    pub provider_id: String,
    pub stat_type: StatType,
}

impl StatKey {
    pub fn new(provider_id: impl Into<String>, stat_type: StatType) -> Self {
        Self {
            provider_id: provider_id.into(),
            stat_type,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_id, self.stat_type)
    }
}

/// One persisted observation of a stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

impl HistoryEntry {
    pub fn new(recorded_at: DateTime<Utc>, value: f64) -> Self {
        Self { recorded_at, value }
    }

    /// Entry stamped with the current time
    pub fn now(value: f64) -> Self {
        Self::new(Utc::now(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for stat in StatType::ALL {
            assert_eq!(stat.tag().parse::<StatType>().unwrap(), stat);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(
            "SHARPE".parse::<StatType>(),
            Err(HistoryError::UnknownStatType(_))
        ));
    }

    #[test]
    fn test_mpdd_windows() {
        assert_eq!(StatType::mpdd(3), Some(StatType::Mpdd3));
        assert_eq!(StatType::mpdd(12), Some(StatType::Mpdd12));
        assert_eq!(StatType::mpdd(4), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(StatKey::new("alpha", StatType::Mpdd6).to_string(), "alpha:MPDD6");
    }
}
