//! Risk scoring configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("risk weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("risk weight `{0}` must be a finite non-negative number")]
    InvalidWeight(&'static str),
}

/// Weights applied to the risk sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Exposure from maximum concurrent lots
    pub exposure: f64,
    /// Martingale (stake escalation after loss)
    pub martingale: f64,
    /// Concurrent trading, derived from the same concurrent lots as `exposure`
    pub concurrent_trading: f64,
    /// Maximum drawdown
    pub drawdown: f64,
    /// Profit factor stability
    pub profit_factor_stability: f64,
}

impl RiskWeights {
    const SUM_EPSILON: f64 = 1e-9;

    /// Check every weight is usable and that they sum to 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("exposure", self.exposure),
            ("martingale", self.martingale),
            ("concurrent_trading", self.concurrent_trading),
            ("drawdown", self.drawdown),
            ("profit_factor_stability", self.profit_factor_stability),
        ];

        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight(name));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > Self::SUM_EPSILON {
            return Err(ConfigError::WeightSum(sum));
        }

        Ok(())
    }

    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.exposure
            + self.martingale
            + self.concurrent_trading
            + self.drawdown
            + self.profit_factor_stability
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            exposure: 0.25,
            martingale: 0.25,
            concurrent_trading: 0.20,
            drawdown: 0.15,
            profit_factor_stability: 0.15,
        }
    }
}
