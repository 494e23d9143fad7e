//! Closed trade records

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a trade record is inconsistent
#[derive(Debug, Error, PartialEq)]
pub enum TradeError {
    #[error("trade on {symbol} closes at {close_time} before it opens at {open_time}")]
    CloseBeforeOpen {
        symbol: String,
        open_time: DateTime<Utc>,
        close_time: DateTime<Utc>,
    },
    #[error("trade on {symbol} has invalid lot size {lots}")]
    InvalidLots { symbol: String, lots: f64 },
    #[error("trade on {symbol} has non-finite profit")]
    InvalidProfit { symbol: String },
}

/// A closed trade of a signal provider
///
/// Deserializing goes through [`TradeRecord`] and rejects records that fail
/// [`Trade::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TradeRecord")]
pub struct Trade {
    /// Instant the position was opened
    pub open_time: DateTime<Utc>,
    /// Instant the position was closed
    pub close_time: DateTime<Utc>,
    /// Position size in lots
    pub lots: f64,
    /// Realized profit (negative for a loss)
    pub profit: f64,
    /// Symbol (e.g., "EURUSD")
    pub symbol: String,
}

/// Unvalidated trade fields as they appear in input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub lots: f64,
    pub profit: f64,
    pub symbol: String,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = TradeError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        Trade::new(
            record.symbol,
            record.open_time,
            record.close_time,
            record.lots,
            record.profit,
        )
    }
}

impl Trade {
    /// Create a new trade, rejecting inconsistent records
    pub fn new(
        symbol: impl Into<String>,
        open_time: DateTime<Utc>,
        close_time: DateTime<Utc>,
        lots: f64,
        profit: f64,
    ) -> Result<Self, TradeError> {
        let trade = Self {
            open_time,
            close_time,
            lots,
            profit,
            symbol: symbol.into(),
        };
        trade.validate()?;
        Ok(trade)
    }

    /// Check the record invariants
    ///
    /// Zero-lot trades are accepted; consumers guard against them.
    pub fn validate(&self) -> Result<(), TradeError> {
        if self.close_time < self.open_time {
            return Err(TradeError::CloseBeforeOpen {
                symbol: self.symbol.clone(),
                open_time: self.open_time,
                close_time: self.close_time,
            });
        }
        if !self.lots.is_finite() || self.lots < 0.0 {
            return Err(TradeError::InvalidLots {
                symbol: self.symbol.clone(),
                lots: self.lots,
            });
        }
        if !self.profit.is_finite() {
            return Err(TradeError::InvalidProfit {
                symbol: self.symbol.clone(),
            });
        }
        Ok(())
    }

    /// Check if the trade closed with a loss
    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }

    /// Check if the trade closed with a profit
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    /// Time the position was held
    pub fn duration(&self) -> Duration {
        self.close_time - self.open_time
    }
}
