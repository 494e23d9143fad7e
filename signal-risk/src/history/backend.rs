//! Storage backends for stat history

use crate::history::{HistoryEntry, HistoryResult, StatKey};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Append-only storage of stat time series
///
/// Backends never mutate or reorder entries once written.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Most recently recorded entry for the key
    async fn latest(&self, key: &StatKey) -> HistoryResult<Option<HistoryEntry>>;

    /// Append an entry to the key's series
    async fn append(&self, key: &StatKey, entry: HistoryEntry) -> HistoryResult<()>;

    /// All entries for the key, newest first
    async fn history(&self, key: &StatKey) -> HistoryResult<Vec<HistoryEntry>>;
}

/// In-memory history backend
#[derive(Debug, Default)]
pub struct MemoryHistoryBackend {
    series: RwLock<HashMap<StatKey, Vec<HistoryEntry>>>,
}

impl MemoryHistoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entries across all series
    pub async fn len(&self) -> usize {
        self.series.read().await.values().map(|v| v.len()).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl HistoryBackend for MemoryHistoryBackend {
    async fn latest(&self, key: &StatKey) -> HistoryResult<Option<HistoryEntry>> {
        let series = self.series.read().await;
        Ok(series.get(key).and_then(|entries| entries.last().copied()))
    }

    async fn append(&self, key: &StatKey, entry: HistoryEntry) -> HistoryResult<()> {
        self.series
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn history(&self, key: &StatKey) -> HistoryResult<Vec<HistoryEntry>> {
        let series = self.series.read().await;
        Ok(series
            .get(key)
            .map(|entries| entries.iter().rev().copied().collect())
            .unwrap_or_default())
    }
}
