//! Example: scoring a provider that doubles its stake after losses

use chrono::{Duration, TimeZone, Utc};
use signal_risk::prelude::*;
use std::sync::Arc;

fn create_martingale_trades(rounds: usize) -> Vec<Trade> {
    let base_time = Utc.with_ymd_and_hms(2024, 1, 8, 7, 0, 0).unwrap();
    let mut trades = Vec::new();
    let mut lots = 0.01;

    for i in 0..rounds {
        let open = base_time + Duration::days(i as i64 * 3);
        // Every fourth trade recovers the losing streak
        let won = i % 4 == 3;
        let profit = if won { 40.0 } else { -12.0 };

        trades.push(
            Trade::new("EURUSD", open, open + Duration::hours(6), lots, profit)
                .expect("generated trade is valid"),
        );
        lots = if won { 0.01 } else { lots * 2.0 };
    }

    trades
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let store = Arc::new(StatHistoryStore::new(MemoryHistoryBackend::new()));
    let analyzer = ProviderAnalyzer::new(RiskScorer::default(), store.clone());

    let input = ProviderInput::new("doubling-dan", 2_000.0, create_martingale_trades(60));
    let report = analyzer.analyze(&input).await;
    println!("{}", report.format());

    for entry in store.get_stat_history("doubling-dan", StatType::Mpdd3).await {
        println!("{} MPDD3 = {:.4}", entry.recorded_at, entry.value);
    }

    Ok(())
}
