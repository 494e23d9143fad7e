//! Martingale (stake escalation after loss) detection

use crate::data::Trade;
use serde::{Deserialize, Serialize};

/// Lot ratio above which a post-loss trade counts as an escalation
pub const ESCALATION_RATIO: f64 = 1.5;

/// Lot size that maps to 10 points of the lot size score
const LOT_SIZE_UNIT: f64 = 0.1;

/// Post-loss staking behaviour of a trade sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MartingaleAnalysis {
    /// Largest `lots[i] / lots[i-1]` where trade `i-1` lost
    pub max_lot_increase: f64,
    /// Number of loss-then-larger-trade pairs above the escalation ratio.
    /// Pairs anywhere in the sequence count; they need not be consecutive.
    pub escalations_after_loss: usize,
    /// Largest lot size of a trade opened right after a loss
    pub max_lots_after_loss: f64,
}

impl MartingaleAnalysis {
    /// Analyse trades in open-time order
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut analysis = Self::default();
        if trades.len() < 2 {
            return analysis;
        }

        let mut ordered: Vec<&Trade> = trades.iter().collect();
        ordered.sort_by_key(|t| t.open_time);

        for pair in ordered.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if !previous.is_loss() {
                continue;
            }

            analysis.max_lots_after_loss = analysis.max_lots_after_loss.max(current.lots);

            if previous.lots <= 0.0 {
                continue;
            }
            let lot_increase = current.lots / previous.lots;
            analysis.max_lot_increase = analysis.max_lot_increase.max(lot_increase);
            if lot_increase > ESCALATION_RATIO {
                analysis.escalations_after_loss += 1;
            }
        }

        analysis
    }

    /// Score from the multiplication pattern
    pub fn base_score(&self) -> f64 {
        (self.max_lot_increase * 20.0 + self.escalations_after_loss as f64 * 5.0).min(100.0)
    }

    /// Score from absolute lot sizes kept after losses
    pub fn lot_size_score(&self) -> f64 {
        (self.max_lots_after_loss / LOT_SIZE_UNIT * 10.0).min(100.0)
    }

    /// Martingale risk in [0, 100], the stronger of the two signals
    pub fn score(&self) -> f64 {
        self.base_score().max(self.lot_size_score())
    }
}

/// Martingale risk of a trade collection in [0, 100]
pub fn martingale_score(trades: &[Trade]) -> f64 {
    MartingaleAnalysis::from_trades(trades).score()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn trade(open_h: i64, lots: f64, profit: f64) -> Trade {
        let open = t0() + Duration::hours(open_h);
        Trade::new("GBPUSD", open, open + Duration::minutes(30), lots, profit).unwrap()
    }

    #[test]
    fn test_fewer_than_two_trades() {
        assert_eq!(martingale_score(&[]), 0.0);
        assert_eq!(martingale_score(&[trade(0, 5.0, -10.0)]), 0.0);
    }

    #[test]
    fn test_escalation_after_loss() {
        let trades = vec![trade(0, 1.0, -10.0), trade(1, 2.5, 5.0)];
        let analysis = MartingaleAnalysis::from_trades(&trades);
        assert_eq!(analysis.escalations_after_loss, 1);
        assert_eq!(analysis.max_lot_increase, 2.5);
        assert_eq!(analysis.base_score(), 55.0);
        assert_eq!(analysis.lot_size_score(), 100.0);
        assert_eq!(analysis.score(), 100.0);
    }

    #[test]
    fn test_small_lots_use_base_score() {
        let trades = vec![trade(0, 0.01, -1.0), trade(1, 0.02, 1.0)];
        let analysis = MartingaleAnalysis::from_trades(&trades);
        assert_eq!(analysis.escalations_after_loss, 1);
        assert!((analysis.lot_size_score() - 2.0).abs() < 1e-9);
        assert!((analysis.score() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorts_by_open_time() {
        // Listed out of order: the loss at hour 0 precedes the 3-lot trade.
        let trades = vec![trade(1, 0.03, 2.0), trade(0, 0.01, -4.0)];
        let analysis = MartingaleAnalysis::from_trades(&trades);
        assert!((analysis.max_lot_increase - 3.0).abs() < 1e-9);
        assert_eq!(analysis.escalations_after_loss, 1);
    }

    #[test]
    fn test_winning_predecessor_is_ignored() {
        let trades = vec![trade(0, 0.01, 4.0), trade(1, 0.05, -2.0)];
        assert_eq!(MartingaleAnalysis::from_trades(&trades), MartingaleAnalysis::default());
    }

    #[test]
    fn test_non_consecutive_pairs_all_count() {
        let trades = vec![
            trade(0, 0.01, -1.0),
            trade(1, 0.02, 3.0),
            trade(2, 0.01, 1.0),
            trade(3, 0.01, -1.0),
            trade(4, 0.04, 2.0),
        ];
        let analysis = MartingaleAnalysis::from_trades(&trades);
        assert_eq!(analysis.escalations_after_loss, 2);
        assert!((analysis.max_lot_increase - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_lot_predecessor_contributes_no_ratio() {
        let trades = vec![trade(0, 0.0, -1.0), trade(1, 0.05, 1.0)];
        let analysis = MartingaleAnalysis::from_trades(&trades);
        assert_eq!(analysis.max_lot_increase, 0.0);
        assert_eq!(analysis.escalations_after_loss, 0);
        assert!((analysis.max_lots_after_loss - 0.05).abs() < 1e-12);
        assert!(analysis.score().is_finite());
    }

    #[test]
    fn test_ratio_at_threshold_is_not_escalation() {
        let trades = vec![trade(0, 0.02, -1.0), trade(1, 0.03, 1.0)];
        assert_eq!(MartingaleAnalysis::from_trades(&trades).escalations_after_loss, 0);
    }
}
