use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use signal_risk::analysis::ProviderInput;
use signal_risk::data::{MonthlyProfitMap, Trade, TradeRecord};
use std::path::Path;
use tracing::{info, warn};

/// A batch of providers to analyse, as read from a JSON file
#[derive(Debug, Clone, Serialize)]
pub struct ProviderBatch {
    pub providers: Vec<ProviderInput>,
}

/// Batch file layout before trade validation
#[derive(Debug, Deserialize)]
struct BatchFile {
    providers: Vec<ProviderEntry>,
}

#[derive(Debug, Deserialize)]
struct ProviderEntry {
    provider_id: String,
    initial_balance: f64,
    trades: Vec<TradeRecord>,
    #[serde(default)]
    monthly_profits: Option<MonthlyProfitMap>,
    #[serde(default)]
    equity_drawdown: Option<f64>,
}

impl ProviderEntry {
    /// Convert to an analysis input, dropping trades that break the trade invariants
    fn into_input(self) -> ProviderInput {
        let provider_id = self.provider_id;
        let trades: Vec<Trade> = self
            .trades
            .into_iter()
            .filter_map(|record| match Trade::try_from(record) {
                Ok(trade) => Some(trade),
                Err(e) => {
                    warn!("Dropping trade of provider {}: {}", provider_id, e);
                    None
                }
            })
            .collect();

        let mut input = ProviderInput::new(provider_id, self.initial_balance, trades);
        input.monthly_profits = self.monthly_profits;
        input.equity_drawdown = self.equity_drawdown;
        input
    }
}

impl ProviderBatch {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: BatchFile = serde_json::from_str(json).context("Failed to parse provider batch")?;
        Ok(Self {
            providers: file.providers.into_iter().map(ProviderEntry::into_input).collect(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider batch {}", path.display()))?;
        let batch = Self::from_json(&json)?;
        info!("Loaded {} providers from {}", batch.providers.len(), path.display());
        Ok(batch)
    }
}
