use sea_orm_migration::prelude::*;

use super::m20260805_000001_create_sources::Sources;

// Source keys must match the adapter registry in the main crate.
const SOURCE_ROWS: [(&str, &str, &str); 3] = [
    ("nbu", "National Bank of Ukraine", "Національний банк України"),
    ("privatbank", "PrivatBank", "ПриватБанк"),
    ("ukrsibbank", "UkrSibBank", "УкрСиббанк"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (key, name_en, name_uk) in SOURCE_ROWS {
            let insert = Query::insert()
                .into_table(Sources::Table)
                .columns([
                    Sources::Key,
                    Sources::NameEn,
                    Sources::NameUk,
                    Sources::CreatedAt,
                    Sources::UpdatedAt,
                ])
                .values_panic([
                    key.into(),
                    name_en.into(),
                    name_uk.into(),
                    Expr::current_timestamp().into(),
                    Expr::current_timestamp().into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Sources::Table)
            .and_where(Expr::col(Sources::Key).is_in(SOURCE_ROWS.map(|(key, _, _)| key)))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
