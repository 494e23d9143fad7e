//! Monthly profit divided by drawdown (MPDD)
//!
//! The most recent month of a profit map is always treated as incomplete and
//! left out. The 3-month window averages whatever trailing months exist (at
//! least one); every other window requires the full number of trailing months
//! and yields 0.0 otherwise.
//!
//! Missing or degenerate data never produces an error: the result is 0.0 and
//! a warning is logged, so one bad provider does not stop a batch.

use crate::data::MonthlyProfitMap;
use tracing::warn;

/// Window that tolerates fewer trailing months than requested
pub const PARTIAL_WINDOW_MONTHS: usize = 3;

/// Standard MPDD windows, in months
pub const MPDD_WINDOWS: [usize; 4] = [3, 6, 9, 12];

/// Average profit percentage over the trailing `months` complete months
pub fn average_monthly_profit(monthly_profits: &MonthlyProfitMap, months: usize) -> f64 {
    if monthly_profits.is_empty() || months == 0 {
        return 0.0;
    }

    let available = monthly_profits.len();
    let trailing = available - 1;

    let window = if months == PARTIAL_WINDOW_MONTHS {
        if trailing < 1 {
            warn!(
                "MPDD {}M needs at least 2 months of data, only {} available",
                months, available
            );
            return 0.0;
        }
        trailing.min(months)
    } else {
        if available < months + 1 {
            warn!(
                "MPDD {}M needs {} months of data, only {} available",
                months,
                months + 1,
                available
            );
            return 0.0;
        }
        months
    };

    // Newest first, skipping the current month
    let total: f64 = monthly_profits
        .values()
        .rev()
        .skip(1)
        .take(window)
        .sum();

    total / window as f64
}

/// Average profit divided by equity drawdown, 0.0 when drawdown is not positive
pub fn mpdd(average_profit: f64, equity_drawdown: f64) -> f64 {
    if equity_drawdown.is_nan() || equity_drawdown <= 0.0 {
        warn!("MPDD needs a positive equity drawdown, got {}", equity_drawdown);
        return 0.0;
    }
    average_profit / equity_drawdown
}

/// MPDD for one window of a monthly profit map
pub fn mpdd_for_window(
    monthly_profits: &MonthlyProfitMap,
    months: usize,
    equity_drawdown: f64,
) -> f64 {
    mpdd(average_monthly_profit(monthly_profits, months), equity_drawdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use crate::data::YearMonth;

    fn profits(values: &[f64]) -> MonthlyProfitMap {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let month = YearMonth::new(2023 + (i / 12) as i32, (i % 12) as u32 + 1).unwrap();
                (month, *v)
            })
            .collect()
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(average_monthly_profit(&MonthlyProfitMap::new(), 3), 0.0);
    }

    #[test]
    fn test_single_month_is_current() {
        let map = profits(&[5.0]);
        for months in MPDD_WINDOWS {
            assert_eq!(average_monthly_profit(&map, months), 0.0);
        }
    }

    #[test]
    fn test_three_month_window_degrades() {
        // Two complete months + current
        let map = profits(&[2.0, 4.0, 100.0]);
        assert_eq!(average_monthly_profit(&map, 3), 3.0);
    }

    #[test]
    fn test_three_month_window_takes_most_recent() {
        let map = profits(&[50.0, 1.0, 2.0, 3.0, 99.0]);
        assert_eq!(average_monthly_profit(&map, 3), 2.0);
    }

    #[test]
    fn test_larger_windows_require_full_history() {
        let map = profits(&[1.0; 6]);
        assert_eq!(average_monthly_profit(&map, 6), 0.0);

        let map = profits(&[1.0; 7]);
        assert_eq!(average_monthly_profit(&map, 6), 1.0);
    }

    #[test]
    fn test_twelve_month_window_across_years() {
        let mut values = vec![2.0; 12];
        values.push(-40.0);
        let map = profits(&values);
        assert_eq!(average_monthly_profit(&map, 12), 2.0);
        assert_eq!(average_monthly_profit(&map, 9), 2.0);
    }

    #[test]
    fn test_mpdd_guards_drawdown() {
        assert_eq!(mpdd(3.0, 0.0), 0.0);
        assert_eq!(mpdd(3.0, -5.0), 0.0);
        assert_eq!(mpdd(3.0, f64::NAN), 0.0);
        assert_eq!(mpdd(3.0, 2.0), 1.5);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_mpdd_warns_on_non_positive_drawdown() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(mpdd(4.0, 0.0), 0.0);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("positive equity drawdown"));
    }

    #[test]
    fn test_zero_month_window() {
        assert_eq!(average_monthly_profit(&profits(&[1.0, 2.0]), 0), 0.0);
    }
}
