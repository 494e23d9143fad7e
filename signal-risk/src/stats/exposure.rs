//! Concurrent lot exposure
//!
//! Sweeps the open/close instants of every trade in chronological order and
//! tracks how many lots are open at once. Deltas that fall on the same instant
//! are merged before accumulating, so a trade that opens and closes at the
//! same instant contributes nothing.

use crate::data::Trade;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Signed lot deltas keyed by exact instant, in chronological order
fn lot_deltas(trades: &[Trade]) -> BTreeMap<DateTime<Utc>, f64> {
    let mut deltas: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    for trade in trades {
        *deltas.entry(trade.open_time).or_insert(0.0) += trade.lots;
        *deltas.entry(trade.close_time).or_insert(0.0) -= trade.lots;
    }
    deltas
}

/// Maximum number of lots open at any instant
///
/// Lots add up linearly across symbols; no netting is applied.
pub fn max_concurrent_lots(trades: &[Trade]) -> f64 {
    let mut open_lots = 0.0;
    let mut max_lots: f64 = 0.0;

    for delta in lot_deltas(trades).into_values() {
        open_lots += delta;
        max_lots = max_lots.max(open_lots);
    }

    max_lots
}

/// Open lots after each instant at which exposure changes
pub fn exposure_timeline(trades: &[Trade]) -> Vec<(DateTime<Utc>, f64)> {
    let mut open_lots = 0.0;
    lot_deltas(trades)
        .into_iter()
        .map(|(instant, delta)| {
            open_lots += delta;
            (instant, open_lots)
        })
        .collect()
}

/// First instant at which open lots reach their maximum, with that maximum
///
/// `None` when no trade ever has open lots.
pub fn peak_exposure(trades: &[Trade]) -> Option<(DateTime<Utc>, f64)> {
    exposure_timeline(trades)
        .into_iter()
        .filter(|(_, lots)| *lots > 0.0)
        .fold(None, |peak, (instant, lots)| match peak {
            Some((_, best)) if best >= lots => peak,
            _ => Some((instant, lots)),
        })
}
