pub mod nbu;
pub mod privatbank;
pub mod ukrsibbank;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike, Utc};
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// One normalized buy/sell quote produced by a source adapter, not yet
/// persisted. Timestamps are truncated to microseconds so that values read
/// back from Postgres compare equal to freshly constructed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub source_id: i32,
    pub unit: i32,
    pub unit_currency_code: String,
    pub rate_currency_code: String,
    pub buy_rate: f64,
    pub sale_rate: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl QuoteRecord {
    pub fn new(
        source_id: i32,
        unit: i32,
        unit_currency_code: String,
        rate_currency_code: String,
        buy_rate: f64,
        sale_rate: f64,
    ) -> Self {
        let observed_at = now_micros();

        Self {
            source_id,
            unit,
            unit_currency_code,
            rate_currency_code,
            buy_rate,
            sale_rate,
            created_at: observed_at,
            updated_at: observed_at,
        }
    }
}

/// One external origin of exchange rates. An adapter instance is bound to
/// its persisted source id and is good for a single `fetch` call per job.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Issues the source's HTTP request, parses the body and returns the
    /// filtered quote records. Zero structural items in the response is an
    /// error; records dropped by the inclusion predicate are not.
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, IngestError>;
}

/// Keys with a registered adapter, in seeding order.
pub const REGISTERED_SOURCES: [&str; 3] = [
    nbu::NbuAdapter::KEY,
    privatbank::PrivatBankAdapter::KEY,
    ukrsibbank::UkrSibBankAdapter::KEY,
];

pub fn is_registered(key: &str) -> bool {
    REGISTERED_SOURCES.contains(&key)
}

/// Static registry: configured source key -> adapter bound to the source id.
pub fn create_adapter(key: &str, source_id: i32) -> Result<Box<dyn SourceAdapter>, IngestError> {
    if key == nbu::NbuAdapter::KEY {
        Ok(Box::new(nbu::NbuAdapter::new(source_id)))
    } else if key == privatbank::PrivatBankAdapter::KEY {
        Ok(Box::new(privatbank::PrivatBankAdapter::new(source_id)))
    } else if key == ukrsibbank::UkrSibBankAdapter::KEY {
        Ok(Box::new(ukrsibbank::UkrSibBankAdapter::new(source_id)))
    } else {
        Err(IngestError::UnsupportedSource(key.to_string()))
    }
}

// Currency pairs the adapters keep; everything else is dropped by predicate.
pub(crate) const ALLOWED_CURRENCY_CODES: [&str; 3] = ["USD", "EUR", "UAH"];

/// Current UTC time truncated to microseconds (Postgres timestamp precision).
pub fn now_micros() -> NaiveDateTime {
    let now = Utc::now().naive_utc();

    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000).unwrap()
}

/// Collected text of an element and its descendants, trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
