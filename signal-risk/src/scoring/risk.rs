//! Weighted provider risk score

use crate::config::{ConfigError, RiskWeights};
use crate::stats::ProviderStats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk score in [1, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiskScore(u8);

impl RiskScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Round a raw weighted sum and clamp it into [1, 100]
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(Self::MIN);
        }
        let rounded = raw.round().clamp(Self::MIN as f64, Self::MAX as f64);
        Self(rounded as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn category(&self) -> RiskCategory {
        RiskCategory::from_score(self.0)
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk category derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Conservative,
    Moderate,
    MediumRisk,
    HighRisk,
    ExtremeRisk,
}

impl RiskCategory {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => Self::Conservative,
            21..=40 => Self::Moderate,
            41..=60 => Self::MediumRisk,
            61..=80 => Self::HighRisk,
            _ => Self::ExtremeRisk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::MediumRisk => "Medium-risk",
            Self::HighRisk => "High-risk",
            Self::ExtremeRisk => "Extreme-risk",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unweighted sub-scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub exposure: f64,
    pub martingale: f64,
    pub concurrent_trading: f64,
    pub drawdown: f64,
    pub profit_factor_stability: f64,
}

impl RiskBreakdown {
    /// Weighted sum of the sub-scores
    pub fn weighted_sum(&self, weights: &RiskWeights) -> f64 {
        self.exposure * weights.exposure
            + self.martingale * weights.martingale
            + self.concurrent_trading * weights.concurrent_trading
            + self.drawdown * weights.drawdown
            + self.profit_factor_stability * weights.profit_factor_stability
    }
}

/// Step function mapping concurrently open lots to a 0-100 risk
pub fn concurrent_lots_risk(lots: f64) -> f64 {
    if lots > 15.0 {
        100.0
    } else if lots > 12.0 {
        80.0
    } else if lots > 8.0 {
        60.0
    } else if lots > 4.0 {
        40.0
    } else {
        lots * 10.0
    }
}

/// Combines provider statistics into a single risk score
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    weights: RiskWeights,
}

impl RiskScorer {
    /// Create a scorer with custom weights
    ///
    /// Weights that are negative, not finite or do not sum to 1.0 are rejected.
    pub fn new(weights: RiskWeights) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Compute the five sub-scores
    ///
    /// Exposure and concurrent trading both come from `max_concurrent_lots`,
    /// so concurrency carries the weight of both.
    pub fn breakdown(&self, stats: &ProviderStats) -> RiskBreakdown {
        let lots_risk = concurrent_lots_risk(stats.max_concurrent_lots);

        // max_drawdown is already a percentage
        let drawdown = stats.max_drawdown.min(100.0);

        // A profit factor above 1 lowers this, below 1 raises it.
        // Without trades there is no profit factor to judge.
        let profit_factor_stability = if stats.has_trades() {
            ((1.0 - stats.profit_factor) * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        RiskBreakdown {
            exposure: lots_risk,
            martingale: stats.martingale_score,
            concurrent_trading: lots_risk,
            drawdown,
            profit_factor_stability,
        }
    }

    /// Compute the risk score in [1, 100]
    pub fn score(&self, stats: &ProviderStats) -> RiskScore {
        RiskScore::from_raw(self.breakdown(stats).weighted_sum(&self.weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(lots: f64, martingale: f64, drawdown: f64, profit_factor: f64) -> ProviderStats {
        ProviderStats {
            trade_count: 10,
            max_concurrent_lots: lots,
            martingale_score: martingale,
            max_drawdown: drawdown,
            profit_factor,
            ..ProviderStats::default()
        }
    }

    #[test]
    fn test_step_function() {
        assert_eq!(concurrent_lots_risk(16.0), 100.0);
        assert_eq!(concurrent_lots_risk(15.0), 80.0);
        assert_eq!(concurrent_lots_risk(12.5), 80.0);
        assert_eq!(concurrent_lots_risk(12.0), 60.0);
        assert_eq!(concurrent_lots_risk(8.0), 40.0);
        assert_eq!(concurrent_lots_risk(4.0), 40.0);
        assert_eq!(concurrent_lots_risk(2.5), 25.0);
    }

    #[test]
    fn test_all_zero_stats_hit_floor() {
        let score = RiskScorer::default().score(&ProviderStats::default());
        assert_eq!(score.value(), 1);
        assert_eq!(score.category(), RiskCategory::Conservative);
    }

    #[test]
    fn test_weighted_combination() {
        // lots 2 -> 20 (x0.25 + x0.20), martingale 40 x0.25, drawdown 20 x0.15,
        // profit factor 0.6 -> 40 x0.15
        let score = RiskScorer::default().score(&stats(2.0, 40.0, 20.0, 0.6));
        // 5 + 10 + 4 + 3 + 6 = 28
        assert_eq!(score.value(), 28);
        assert_eq!(score.category(), RiskCategory::Moderate);
    }

    #[test]
    fn test_profitable_provider_has_no_stability_risk() {
        let breakdown = RiskScorer::default().breakdown(&stats(0.0, 0.0, 0.0, 2.0));
        assert_eq!(breakdown.profit_factor_stability, 0.0);

        let breakdown = RiskScorer::default().breakdown(&stats(0.0, 0.0, 0.0, f64::INFINITY));
        assert_eq!(breakdown.profit_factor_stability, 0.0);
    }

    #[test]
    fn test_losing_provider_with_trades() {
        let breakdown = RiskScorer::default().breakdown(&stats(0.0, 0.0, 0.0, 0.0));
        assert_eq!(breakdown.profit_factor_stability, 100.0);
    }

    #[test]
    fn test_maximum_risk_is_capped() {
        let score = RiskScorer::default().score(&stats(40.0, 100.0, 250.0, 0.0));
        assert_eq!(score.value(), 100);
        assert_eq!(score.category(), RiskCategory::ExtremeRisk);
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(RiskCategory::from_score(20).label(), "Conservative");
        assert_eq!(RiskCategory::from_score(21).label(), "Moderate");
        assert_eq!(RiskCategory::from_score(40).label(), "Moderate");
        assert_eq!(RiskCategory::from_score(60).label(), "Medium-risk");
        assert_eq!(RiskCategory::from_score(80).label(), "High-risk");
        assert_eq!(RiskCategory::from_score(81).label(), "Extreme-risk");
    }

    #[test]
    fn test_custom_weights_are_validated() {
        let uneven = RiskWeights {
            exposure: 1.0,
            martingale: 1.0,
            concurrent_trading: 1.0,
            drawdown: 1.0,
            profit_factor_stability: 1.0,
        };
        assert_eq!(RiskScorer::new(uneven).unwrap_err(), ConfigError::WeightSum(5.0));

        let negative = RiskWeights {
            exposure: -0.25,
            martingale: 0.75,
            ..RiskWeights::default()
        };
        assert!(matches!(
            RiskScorer::new(negative),
            Err(ConfigError::InvalidWeight("exposure"))
        ));

        let drawdown_heavy = RiskWeights {
            exposure: 0.10,
            martingale: 0.10,
            concurrent_trading: 0.10,
            drawdown: 0.55,
            profit_factor_stability: 0.15,
        };
        let scorer = RiskScorer::new(drawdown_heavy).unwrap();
        assert_eq!(scorer.weights(), &drawdown_heavy);
    }

    #[test]
    fn test_nan_input_stays_in_range() {
        let score = RiskScorer::default().score(&stats(f64::NAN, f64::NAN, 0.0, 1.0));
        assert_eq!(score.value(), 1);
    }
}
