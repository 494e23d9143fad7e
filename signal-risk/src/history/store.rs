//! Stat history store with change suppression

use crate::history::{HistoryBackend, HistoryEntry, StatKey, StatType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// Values closer than this to the latest stored value are not written
pub const CHANGE_TOLERANCE: f64 = 0.001;

/// Per-provider, per-stat history on top of a backend
///
/// Writes to the same (provider, stat) key are serialized so the
/// read-compare-append sequence cannot interleave. Different keys do not
/// block each other. A key's lock lives in `key_locks` only while some write
/// to that key holds or awaits it.
pub struct StatHistoryStore<B> {
    backend: B,
    key_locks: Mutex<HashMap<StatKey, Arc<Mutex<()>>>>,
}

impl<B: HistoryBackend> StatHistoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn key_lock(&self, key: &StatKey) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        locks.entry(key.clone()).or_default().clone()
    }

    /// Drop the key's lock entry unless another writer still holds a handle
    async fn release_key_lock(&self, key: &StatKey, lock: Arc<Mutex<()>>) {
        let mut locks = self.key_locks.lock().await;
        // One handle in the map, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }

    /// Store a stat value unless it matches the latest stored one
    ///
    /// Returns `true` when the value was written or skipped as unchanged, and
    /// `false` when the value is not finite or the backend failed.
    pub async fn store_stat_value(
        &self,
        provider_id: &str,
        stat_type: StatType,
        value: f64,
        force_update: bool,
    ) -> bool {
        let key = StatKey::new(provider_id, stat_type);
        if !value.is_finite() {
            warn!("Refusing to store non-finite value {} for {}", value, key);
            return false;
        }

        let lock = self.key_lock(&key).await;
        let stored = {
            let _guard = lock.lock().await;
            self.write_value(&key, value, force_update).await
        };
        self.release_key_lock(&key, lock).await;
        stored
    }

    /// Read-compare-append for one key; the caller holds the key lock
    async fn write_value(&self, key: &StatKey, value: f64, force_update: bool) -> bool {
        if !force_update {
            match self.backend.latest(key).await {
                Ok(Some(last)) if (last.value - value).abs() < CHANGE_TOLERANCE => {
                    debug!("Skipping unchanged {} = {:.4}", key, value);
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read latest value for {}: {}", key, e);
                    return false;
                }
            }
        }

        match self.backend.append(key, HistoryEntry::now(value)).await {
            Ok(()) => {
                debug!("Stored {} = {:.4}", key, value);
                true
            }
            Err(e) => {
                error!("Failed to store {} = {:.4}: {}", key, value, e);
                false
            }
        }
    }

    /// Latest stored value, `None` when absent or unreadable
    pub async fn get_latest_stat_value(&self, provider_id: &str, stat_type: StatType) -> Option<f64> {
        let key = StatKey::new(provider_id, stat_type);
        match self.backend.latest(&key).await {
            Ok(entry) => entry.map(|e| e.value),
            Err(e) => {
                warn!("Failed to read latest value for {}: {}", key, e);
                None
            }
        }
    }

    /// All stored entries, newest first; empty when unreadable
    pub async fn get_stat_history(&self, provider_id: &str, stat_type: StatType) -> Vec<HistoryEntry> {
        let key = StatKey::new(provider_id, stat_type);
        match self.backend.history(&key).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read history for {}: {}", key, e);
                Vec::new()
            }
        }
    }
}
