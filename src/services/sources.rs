//! Lookup of a configured source's persisted identity (id, display names).
//! Rows are seeded by the migration crate; the ingestion core never writes
//! to this table.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{prelude::*, sources};
use crate::error::IngestError;

pub async fn find_by_key(
    db: &DatabaseConnection,
    key: &str,
) -> Result<sources::Model, IngestError> {
    let source = Sources::find()
        .filter(sources::Column::Key.eq(key))
        .one(db)
        .await?;

    source.ok_or_else(|| IngestError::SourceNotFound(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn source_row() -> sources::Model {
        let seeded_at = NaiveDate::from_ymd_opt(2026, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        sources::Model {
            id: 1,
            key: "nbu".to_string(),
            name_en: "National Bank of Ukraine".to_string(),
            name_uk: "Національний банк України".to_string(),
            created_at: seeded_at,
            updated_at: seeded_at,
        }
    }

    #[tokio::test]
    async fn test_find_by_key_returns_seeded_source() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![source_row()]])
            .into_connection();

        let source = find_by_key(&db, "nbu").await.unwrap();

        assert_eq!(source.id, 1);
        assert_eq!(source.name_en, "National Bank of Ukraine");
    }

    #[tokio::test]
    async fn test_find_by_key_fails_when_source_is_not_seeded() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sources::Model>::new()])
            .into_connection();

        let error = find_by_key(&db, "monobank").await.unwrap_err();

        assert!(matches!(error, IngestError::SourceNotFound(key) if key == "monobank"));
    }
}
