//! Provider report formatting

use crate::analysis::ProviderReport;

impl ProviderReport {
    /// Format report as string
    pub fn format(&self) -> String {
        let mpdd_lines: String = self
            .mpdd
            .iter()
            .map(|(months, value)| format!("MPDD {}M: {:.4}\n", months, value))
            .collect();

        let peak = match self.peak_exposure_at {
            Some(instant) => format!(" (peak at {})", instant.format("%Y-%m-%d %H:%M UTC")),
            None => String::new(),
        };

        let mut text = format!(
            r#"
Provider Risk Report: {}
==========================
Trades: {}
Total Profit: ${:.2}
Win Rate: {:.2}%
Profit Factor: {:.2}
Maximum Drawdown: {:.2}%
Max Concurrent Lots: {:.2}{}
Martingale Score: {:.2} (max lot increase {:.2}x, {} escalations after loss)
Risk Score: {} ({})
Equity Drawdown: {:.2}%
{}"#,
            self.provider_id,
            self.stats.trade_count,
            self.stats.total_profit,
            self.stats.win_rate,
            self.stats.profit_factor,
            self.stats.max_drawdown,
            self.stats.max_concurrent_lots,
            peak,
            self.stats.martingale_score,
            self.martingale.max_lot_increase,
            self.martingale.escalations_after_loss,
            self.risk_score,
            self.category,
            self.equity_drawdown,
            mpdd_lines,
        );

        if !self.persistence_failures.is_empty() {
            let failed: Vec<String> = self
                .persistence_failures
                .iter()
                .map(|s| s.to_string())
                .collect();
            text.push_str(&format!("Not persisted: {}\n", failed.join(", ")));
        }

        text
    }
}
