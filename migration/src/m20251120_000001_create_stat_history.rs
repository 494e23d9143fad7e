use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only: rows are never updated once written
        manager
            .create_table(
                Table::create()
                    .table(StatHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StatHistory::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(StatHistory::ProviderId).string().not_null())
                    .col(ColumnDef::new(StatHistory::StatType).string_len(32).not_null())
                    .col(ColumnDef::new(StatHistory::Value).double().not_null())
                    .col(ColumnDef::new(StatHistory::RecordedAt).timestamp_with_time_zone().not_null())
                    .index(
                        Index::create()
                            .name("idx_stat_history_series")
                            .table(StatHistory::Table)
                            .col(StatHistory::ProviderId)
                            .col(StatHistory::StatType)
                            .col(StatHistory::RecordedAt)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StatHistory {
    Table,
    Id,
    ProviderId,
    StatType,
    Value,
    RecordedAt,
}
