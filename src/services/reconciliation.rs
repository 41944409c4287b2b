//! Versioned upsert of quote batches.
//!
//! One transaction per batch: every record of a job's fetch is applied, or
//! none is. Per record the current row is updated in place (or created), and
//! the version ledger either gains a row (value changed or first observation)
//! or has its newest row re-stamped (value unchanged).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{current_quotes, prelude::*, quote_versions};
use crate::error::IngestError;
use crate::scrapers::QuoteRecord;

pub async fn reconcile(
    db: &DatabaseConnection,
    records: &[QuoteRecord],
) -> Result<(), IngestError> {
    let txn = db.begin().await?;

    for record in records {
        if let Err(error) = apply_record(&txn, record).await {
            txn.rollback().await?;

            return Err(error);
        }
    }

    txn.commit().await?;

    Ok(())
}

async fn apply_record(
    txn: &DatabaseTransaction,
    record: &QuoteRecord,
) -> Result<(), IngestError> {
    // Natural key lookup: one current row per (source, currency pair)
    let existing = CurrentQuotes::find()
        .filter(current_quotes::Column::SourceId.eq(record.source_id))
        .filter(current_quotes::Column::UnitCurrencyCode.eq(record.unit_currency_code.as_str()))
        .filter(current_quotes::Column::RateCurrencyCode.eq(record.rate_currency_code.as_str()))
        .one(txn)
        .await?;

    let current = match existing {
        Some(current) => {
            let mut current: current_quotes::ActiveModel = current.into();

            current.unit = Set(record.unit);
            current.buy_rate = Set(record.buy_rate);
            current.sale_rate = Set(record.sale_rate);
            current.updated_at = Set(record.updated_at);

            current.update(txn).await?
        }
        None => {
            current_quotes::ActiveModel {
                source_id: Set(record.source_id),
                unit: Set(record.unit),
                unit_currency_code: Set(record.unit_currency_code.clone()),
                rate_currency_code: Set(record.rate_currency_code.clone()),
                buy_rate: Set(record.buy_rate),
                sale_rate: Set(record.sale_rate),
                created_at: Set(record.created_at),
                updated_at: Set(record.updated_at),
                ..Default::default()
            }
            .insert(txn)
            .await?
        }
    };

    // Most recently updated version of this quote, if any
    let latest = QuoteVersions::find()
        .filter(quote_versions::Column::CurrentQuoteId.eq(current.id))
        .order_by_desc(quote_versions::Column::UpdatedAt)
        .one(txn)
        .await?;

    match latest {
        // Exact value equality on the triple; consecutive identical
        // observations collapse into one row with an advancing updated_at
        Some(latest)
            if latest.unit == current.unit
                && latest.buy_rate == current.buy_rate
                && latest.sale_rate == current.sale_rate =>
        {
            let mut latest: quote_versions::ActiveModel = latest.into();

            latest.updated_at = Set(current.updated_at);

            latest.update(txn).await?;
        }
        _ => {
            quote_versions::ActiveModel {
                current_quote_id: Set(current.id),
                unit: Set(current.unit),
                buy_rate: Set(current.buy_rate),
                sale_rate: Set(current.sale_rate),
                created_at: Set(record.created_at),
                updated_at: Set(record.updated_at),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
    }

    Ok(())
}
