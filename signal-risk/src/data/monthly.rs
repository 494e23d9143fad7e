//! Calendar months and per-month profit maps

use crate::data::Trade;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Month number outside 1..=12 or malformed `YYYY-MM` text
#[derive(Debug, Error, PartialEq)]
#[error("invalid year-month `{0}`, expected YYYY-MM")]
pub struct YearMonthParseError(String);

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year-month, `None` when `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing the given instant
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || YearMonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Profit percentage per calendar month
pub type MonthlyProfitMap = BTreeMap<YearMonth, f64>;

/// Build a monthly profit map from closed trades
///
/// Each trade is attributed to the month it closed in. A month's percentage is
/// its profit relative to the balance at the start of that month, with the
/// balance compounding from `initial_balance`. Months with no closed trades do
/// not appear in the map.
pub fn monthly_profit_percentages(trades: &[Trade], initial_balance: f64) -> MonthlyProfitMap {
    let mut profit_by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for trade in trades {
        *profit_by_month
            .entry(YearMonth::from_datetime(trade.close_time))
            .or_insert(0.0) += trade.profit;
    }

    let mut balance = initial_balance;
    let mut percentages = MonthlyProfitMap::new();
    for (month, profit) in profit_by_month {
        let percentage = if balance > 0.0 {
            profit / balance * 100.0
        } else {
            warn!(
                "Balance {:.2} at start of {} is not positive, recording 0% for the month",
                balance, month
            );
            0.0
        };
        percentages.insert(month, percentage);
        balance += profit;
    }

    percentages
}
