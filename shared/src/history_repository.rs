//! Stat history persisted through Sea-ORM

use crate::entity::stat_history;
use async_trait::async_trait;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
    TransactionTrait,
};
use signal_risk::history::{HistoryBackend, HistoryEntry, HistoryError, HistoryResult, StatKey};
use std::sync::Arc;

/// History backend storing entries in the `stat_history` table
pub struct SeaOrmHistoryBackend {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmHistoryBackend {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Rows of one series, newest first
    fn series(key: &StatKey) -> Select<stat_history::Entity> {
        stat_history::Entity::find()
            .filter(stat_history::Column::ProviderId.eq(key.provider_id.as_str()))
            .filter(stat_history::Column::StatType.eq(key.stat_type.tag()))
            .order_by_desc(stat_history::Column::RecordedAt)
            .order_by_desc(stat_history::Column::Id)
    }
}

fn backend_error(e: DbErr) -> HistoryError {
    HistoryError::Backend(e.to_string())
}

fn to_entry(model: stat_history::Model) -> HistoryEntry {
    HistoryEntry::new(model.recorded_at, model.value)
}

#[async_trait]
impl HistoryBackend for SeaOrmHistoryBackend {
    async fn latest(&self, key: &StatKey) -> HistoryResult<Option<HistoryEntry>> {
        let row = Self::series(key)
            .one(self.db.as_ref())
            .await
            .map_err(backend_error)?;
        Ok(row.map(to_entry))
    }

    async fn append(&self, key: &StatKey, entry: HistoryEntry) -> HistoryResult<()> {
        let row = stat_history::ActiveModel {
            provider_id: ActiveValue::Set(key.provider_id.clone()),
            stat_type: ActiveValue::Set(key.stat_type.tag().to_string()),
            value: ActiveValue::Set(entry.value),
            recorded_at: ActiveValue::Set(entry.recorded_at),
            ..Default::default()
        };

        // Dropping the transaction without commit rolls the insert back
        let txn = self.db.begin().await.map_err(backend_error)?;
        stat_history::Entity::insert(row)
            .exec(&txn)
            .await
            .map_err(backend_error)?;
        txn.commit().await.map_err(backend_error)?;
        Ok(())
    }

    async fn history(&self, key: &StatKey) -> HistoryResult<Vec<HistoryEntry>> {
        let rows = Self::series(key)
            .all(self.db.as_ref())
            .await
            .map_err(backend_error)?;
        Ok(rows.into_iter().map(to_entry).collect())
    }
}
