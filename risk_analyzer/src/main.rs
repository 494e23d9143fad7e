use anyhow::{bail, Result};
use migration::{Migrator, MigratorTrait};
use shared::{get_db_connection, Config, ProviderBatch, SeaOrmHistoryBackend};
use signal_risk::analysis::{analyze_batch, ProviderAnalyzer};
use signal_risk::history::StatHistoryStore;
use signal_risk::scoring::RiskScorer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Risk analyzer
// Scores a batch of signal providers and records their stats history

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let Some(batch_path) = std::env::args().nth(1) else {
        bail!("usage: risk_analyzer <providers.json>");
    };

    info!("Starting risk analyzer for {}", batch_path);
    let batch = ProviderBatch::load(&batch_path)?;

    let db = get_db_connection(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    info!("Database schema is up to date");

    let store = Arc::new(StatHistoryStore::new(SeaOrmHistoryBackend::new(Arc::new(db))));
    let analyzer = Arc::new(
        ProviderAnalyzer::new(RiskScorer::default(), store)
            .with_force_update(config.force_history_update),
    );

    let reports = analyze_batch(analyzer, batch.providers, config.max_concurrent_providers).await;

    for report in &reports {
        println!("{}", report.format());
    }

    Ok(())
}
