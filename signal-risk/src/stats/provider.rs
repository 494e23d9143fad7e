//! Aggregate statistics over a provider's trades

use crate::data::Trade;
use crate::stats::{max_concurrent_lots, MartingaleAnalysis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Provider performance statistics
///
/// `max_drawdown` and `win_rate` are percentages in [0, 100].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Number of closed trades
    pub trade_count: usize,
    /// Sum of realized profit
    pub total_profit: f64,
    /// Winning trades as a percentage of all trades
    pub win_rate: f64,
    /// Gross profit / gross loss, infinite when there are no losses
    pub profit_factor: f64,
    /// Largest peak-to-trough balance decline, in percent of the peak
    pub max_drawdown: f64,
    /// Largest number of lots open at the same instant
    pub max_concurrent_lots: f64,
    /// Martingale risk in [0, 100]
    pub martingale_score: f64,
}

impl ProviderStats {
    /// Build statistics from closed trades
    ///
    /// The balance curve used for drawdown starts at `initial_balance` and
    /// applies each trade's profit in close-time order.
    pub fn from_trades(trades: &[Trade], initial_balance: f64) -> Self {
        Self::with_martingale(trades, initial_balance, &MartingaleAnalysis::from_trades(trades))
    }

    /// Build statistics reusing an already computed martingale analysis
    pub fn with_martingale(
        trades: &[Trade],
        initial_balance: f64,
        martingale: &MartingaleAnalysis,
    ) -> Self {
        let trade_count = trades.len();
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();

        let winning_trades = trades.iter().filter(|t| t.is_win()).count();
        let win_rate = if trade_count == 0 {
            0.0
        } else {
            winning_trades as f64 / trade_count as f64 * 100.0
        };

        Self {
            trade_count,
            total_profit,
            win_rate,
            profit_factor: profit_factor(trades),
            max_drawdown: max_drawdown_percent(trades, initial_balance),
            max_concurrent_lots: max_concurrent_lots(trades),
            martingale_score: martingale.score(),
        }
    }

    /// Check if the stats were built from at least one trade
    pub fn has_trades(&self) -> bool {
        self.trade_count > 0
    }
}

/// Gross profit divided by gross loss
///
/// Without losing trades the result is `+inf` when there was any profit and
/// `0.0` otherwise.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.is_win()).map(|t| t.profit).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.is_loss())
        .map(|t| t.profit.abs())
        .sum();

    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            return f64::INFINITY;
        }
        return 0.0;
    }
    gross_profit / gross_loss
}

/// Maximum drawdown of the closed-trade balance curve, in percent
pub fn max_drawdown_percent(trades: &[Trade], initial_balance: f64) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    if initial_balance <= 0.0 || !initial_balance.is_finite() {
        warn!(
            "Initial balance {} is not positive, drawdown cannot be computed",
            initial_balance
        );
        return 0.0;
    }

    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.close_time);

    let mut max_drawdown = 0.0;
    let mut peak = initial_balance;
    let mut current = initial_balance;

    for trade in ordered {
        current += trade.profit;
        if current > peak {
            peak = current;
        }
        let drawdown = (peak - current) / peak * 100.0;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    max_drawdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
    }

    fn trade(close_h: i64, profit: f64) -> Trade {
        let close = t0() + Duration::hours(close_h);
        Trade::new("USDJPY", close - Duration::minutes(15), close, 0.1, profit).unwrap()
    }

    #[test]
    fn test_empty_stats() {
        let stats = ProviderStats::from_trades(&[], 1_000.0);
        assert!(!stats.has_trades());
        assert_eq!(stats, ProviderStats::default());
    }

    #[test]
    fn test_win_rate_and_profit() {
        let trades = vec![trade(1, 30.0), trade(2, -10.0), trade(3, 20.0), trade(4, -10.0)];
        let stats = ProviderStats::from_trades(&trades, 1_000.0);
        assert_eq!(stats.trade_count, 4);
        assert_eq!(stats.total_profit, 30.0);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.profit_factor, 2.5);
    }

    #[test]
    fn test_profit_factor_without_losses() {
        assert_eq!(profit_factor(&[trade(1, 5.0)]), f64::INFINITY);
        assert_eq!(profit_factor(&[trade(1, 0.0)]), 0.0);
    }

    #[test]
    fn test_drawdown_is_percent_of_peak() {
        // 1000 -> 1100 (peak) -> 990 -> 1045
        let trades = vec![trade(1, 100.0), trade(2, -110.0), trade(3, 55.0)];
        let drawdown = max_drawdown_percent(&trades, 1_000.0);
        assert!((drawdown - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_drawdown_uses_close_order() {
        let trades = vec![trade(3, 55.0), trade(1, 100.0), trade(2, -110.0)];
        let drawdown = max_drawdown_percent(&trades, 1_000.0);
        assert!((drawdown - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_drawdown_with_non_positive_balance() {
        assert_eq!(max_drawdown_percent(&[trade(1, -5.0)], 0.0), 0.0);
    }
}
