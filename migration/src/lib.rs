pub use sea_orm_migration::prelude::*;

mod m20260805_000001_create_sources;
mod m20260805_000002_create_current_quotes;
mod m20260805_000003_create_quote_versions;
mod m20260805_000004_seed_sources;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260805_000001_create_sources::Migration),
            Box::new(m20260805_000002_create_current_quotes::Migration),
            Box::new(m20260805_000003_create_quote_versions::Migration),
            Box::new(m20260805_000004_seed_sources::Migration),
        ]
    }
}
