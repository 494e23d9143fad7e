//! Signal-Risk: risk scoring and performance statistics for trading signal providers
//!
//! This crate turns a provider's closed trades into the numbers used to rank
//! and monitor that provider:
//!
//! # Features
//!
//! - **Exposure**: maximum concurrently open lots from overlapping trades
//! - **Martingale detection**: stake escalation after losing trades
//! - **Risk score**: weighted 1-100 score with a category label
//! - **MPDD**: trailing monthly profit divided by equity drawdown
//! - **Stat history**: append-only per-provider time series with change suppression
//! - **Batch analysis**: many providers analysed concurrently on tokio
//!
//! # Example
//!
//! ```no_run
//! use signal_risk::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = Arc::new(StatHistoryStore::new(MemoryHistoryBackend::new()));
//!     let analyzer = ProviderAnalyzer::new(RiskScorer::default(), store);
//!     let input = ProviderInput::new("alpha-signals", 10_000.0, Vec::new());
//!     let report = analyzer.analyze(&input).await;
//!     println!("{}", report.format());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod filter;
pub mod history;
pub mod scoring;
pub mod stats;

// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::{analyze_batch, ProviderAnalyzer, ProviderInput, ProviderReport};
    pub use crate::config::{ConfigError, RiskWeights};
    pub use crate::data::{MonthlyProfitMap, Trade, TradeError, YearMonth};
    pub use crate::filter::{CellValue, RowFilter};
    pub use crate::history::{
        HistoryBackend, HistoryEntry, HistoryError, MemoryHistoryBackend, StatHistoryStore, StatKey,
        StatType,
    };
    pub use crate::scoring::{mpdd_for_window, RiskBreakdown, RiskCategory, RiskScore, RiskScorer};
    pub use crate::stats::{max_concurrent_lots, MartingaleAnalysis, ProviderStats};

    pub use anyhow::{Context, Result};
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
