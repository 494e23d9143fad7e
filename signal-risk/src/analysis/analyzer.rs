//! Per-provider analysis and batch execution

use crate::data::{monthly_profit_percentages, MonthlyProfitMap, Trade};
use crate::history::{HistoryBackend, StatHistoryStore, StatType};
use crate::scoring::{mpdd_for_window, RiskBreakdown, RiskCategory, RiskScore, RiskScorer, MPDD_WINDOWS};
use crate::stats::{peak_exposure, MartingaleAnalysis, ProviderStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Drawdown used when the supplied equity drawdown is missing or not positive
pub const DEFAULT_EQUITY_DRAWDOWN: f64 = 1.0;

/// Everything known about one provider for an analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInput {
    /// Stable provider identifier used as the history key
    pub provider_id: String,
    /// Account balance before the first trade
    pub initial_balance: f64,
    /// Closed trades, in any order
    pub trades: Vec<Trade>,
    /// Monthly profit percentages; derived from trades when absent
    #[serde(default)]
    pub monthly_profits: Option<MonthlyProfitMap>,
    /// Equity drawdown percentage; the trade drawdown is used when absent
    #[serde(default)]
    pub equity_drawdown: Option<f64>,
}

impl ProviderInput {
    pub fn new(provider_id: impl Into<String>, initial_balance: f64, trades: Vec<Trade>) -> Self {
        Self {
            provider_id: provider_id.into(),
            initial_balance,
            trades,
            monthly_profits: None,
            equity_drawdown: None,
        }
    }

    pub fn with_monthly_profits(mut self, monthly_profits: MonthlyProfitMap) -> Self {
        self.monthly_profits = Some(monthly_profits);
        self
    }

    pub fn with_equity_drawdown(mut self, equity_drawdown: f64) -> Self {
        self.equity_drawdown = Some(equity_drawdown);
        self
    }
}

/// Coerce an equity drawdown to a usable positive value
pub fn effective_equity_drawdown(equity_drawdown: Option<f64>) -> f64 {
    match equity_drawdown {
        Some(dd) if dd > 0.0 && dd.is_finite() => dd,
        _ => DEFAULT_EQUITY_DRAWDOWN,
    }
}

/// Result of analysing one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReport {
    pub provider_id: String,
    pub stats: ProviderStats,
    pub martingale: MartingaleAnalysis,
    pub breakdown: RiskBreakdown,
    pub risk_score: RiskScore,
    pub category: RiskCategory,
    pub equity_drawdown: f64,
    /// When open lots first reached `stats.max_concurrent_lots`
    #[serde(default)]
    pub peak_exposure_at: Option<DateTime<Utc>>,
    /// MPDD by window length in months
    pub mpdd: BTreeMap<usize, f64>,
    /// Stats that could not be persisted
    #[serde(default)]
    pub persistence_failures: Vec<StatType>,
}

/// Scores providers and records their stats in the history store
pub struct ProviderAnalyzer<B> {
    scorer: RiskScorer,
    store: Arc<StatHistoryStore<B>>,
    force_update: bool,
}

impl<B: HistoryBackend> ProviderAnalyzer<B> {
    pub fn new(scorer: RiskScorer, store: Arc<StatHistoryStore<B>>) -> Self {
        Self {
            scorer,
            store,
            force_update: false,
        }
    }

    /// Write history entries even when values are unchanged
    pub fn with_force_update(mut self, force_update: bool) -> Self {
        self.force_update = force_update;
        self
    }

    pub fn store(&self) -> &Arc<StatHistoryStore<B>> {
        &self.store
    }

    /// Compute the report without touching the store
    pub fn evaluate(&self, input: &ProviderInput) -> ProviderReport {
        let martingale = MartingaleAnalysis::from_trades(&input.trades);
        let stats = ProviderStats::with_martingale(&input.trades, input.initial_balance, &martingale);
        let breakdown = self.scorer.breakdown(&stats);
        let risk_score = self.scorer.score(&stats);

        let monthly_profits = match &input.monthly_profits {
            Some(map) => map.clone(),
            None => monthly_profit_percentages(&input.trades, input.initial_balance),
        };
        let equity_drawdown =
            effective_equity_drawdown(input.equity_drawdown.or(Some(stats.max_drawdown)));

        let mpdd = MPDD_WINDOWS
            .iter()
            .map(|&months| (months, mpdd_for_window(&monthly_profits, months, equity_drawdown)))
            .collect();

        ProviderReport {
            provider_id: input.provider_id.clone(),
            category: risk_score.category(),
            stats,
            martingale,
            breakdown,
            risk_score,
            equity_drawdown,
            peak_exposure_at: peak_exposure(&input.trades).map(|(instant, _)| instant),
            mpdd,
            persistence_failures: Vec::new(),
        }
    }

    /// Compute the report and persist its stats
    pub async fn analyze(&self, input: &ProviderInput) -> ProviderReport {
        let mut report = self.evaluate(input);
        if input.trades.is_empty() {
            warn!("Provider {} has no trades", input.provider_id);
        }

        let mut values: Vec<(StatType, f64)> = report
            .mpdd
            .iter()
            .filter_map(|(&months, &value)| StatType::mpdd(months).map(|stat| (stat, value)))
            .collect();
        values.extend([
            (StatType::WinRate, report.stats.win_rate),
            (StatType::ProfitFactor, report.stats.profit_factor),
            (StatType::TotalProfit, report.stats.total_profit),
            (StatType::MaxDrawdown, report.stats.max_drawdown),
        ]);

        for (stat_type, value) in values {
            // Profit factor is infinite for providers without losses
            if stat_type == StatType::ProfitFactor && !value.is_finite() {
                continue;
            }
            let stored = self
                .store
                .store_stat_value(&input.provider_id, stat_type, value, self.force_update)
                .await;
            if !stored {
                report.persistence_failures.push(stat_type);
            }
        }

        report
    }
}

/// Analyse many providers concurrently
///
/// At most `max_concurrency` providers run at once. A provider whose task
/// panics is logged and left out; the rest of the batch continues. Reports are
/// returned sorted by provider id.
pub async fn analyze_batch<B>(
    analyzer: Arc<ProviderAnalyzer<B>>,
    inputs: Vec<ProviderInput>,
    max_concurrency: usize,
) -> Vec<ProviderReport>
where
    B: HistoryBackend + 'static,
{
    let total = inputs.len();
    let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for input in inputs {
        let analyzer = analyzer.clone();
        let permits = permits.clone();
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            analyzer.analyze(&input).await
        });
    }

    let mut reports = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(e) => error!("Provider analysis task failed: {}", e),
        }
    }

    reports.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
    info!("Analysed {}/{} providers", reports.len(), total);
    reports
}
