use sea_orm_migration::prelude::*;

use super::m20260805_000001_create_sources::Sources;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Latest observed quote per (source, currency pair)
        manager
            .create_table(
                Table::create()
                    .table(CurrentQuotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CurrentQuotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::SourceId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::Unit)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::UnitCurrencyCode)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::RateCurrencyCode)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::BuyRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::SaleRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrentQuotes::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_current_quotes_source_id")
                            .from(CurrentQuotes::Table, CurrentQuotes::SourceId)
                            .to(Sources::Table, Sources::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The natural key: one current row per source and currency pair
        manager
            .create_index(
                Index::create()
                    .name("idx_current_quotes_natural_key")
                    .table(CurrentQuotes::Table)
                    .col(CurrentQuotes::SourceId)
                    .col(CurrentQuotes::UnitCurrencyCode)
                    .col(CurrentQuotes::RateCurrencyCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CurrentQuotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CurrentQuotes {
    Table,
    Id,
    SourceId,
    Unit,
    UnitCurrencyCode,
    RateCurrencyCode,
    BuyRate,
    SaleRate,
    CreatedAt,
    UpdatedAt,
}
