use sea_orm_migration::prelude::*;

use super::m20260805_000002_create_current_quotes::CurrentQuotes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Version ledger: one row per distinct (unit, buy, sale) value of a quote
        manager
            .create_table(
                Table::create()
                    .table(QuoteVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuoteVersions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuoteVersions::CurrentQuoteId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteVersions::Unit)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteVersions::BuyRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteVersions::SaleRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteVersions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteVersions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_versions_current_quote_id")
                            .from(QuoteVersions::Table, QuoteVersions::CurrentQuoteId)
                            .to(CurrentQuotes::Table, CurrentQuotes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The reconciliation engine reads the most recently updated version per quote
        manager
            .create_index(
                Index::create()
                    .name("idx_quote_versions_quote_updated_at")
                    .table(QuoteVersions::Table)
                    .col(QuoteVersions::CurrentQuoteId)
                    .col(QuoteVersions::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuoteVersions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum QuoteVersions {
    Table,
    Id,
    CurrentQuoteId,
    Unit,
    BuyRate,
    SaleRate,
    CreatedAt,
    UpdatedAt,
}
