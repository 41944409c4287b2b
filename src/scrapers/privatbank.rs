//! PrivatBank branch ("at the cash desk") rates from the public p24 JSON API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{QuoteRecord, SourceAdapter, ALLOWED_CURRENCY_CODES};
use crate::error::IngestError;

// The API encodes rates as strings, e.g. {"ccy":"USD","base_ccy":"UAH","buy":"41.05000","sale":"41.65000"}
#[derive(Debug, Deserialize)]
struct PrivatBankQuote {
    ccy: String,
    base_ccy: String,
    buy: String,
    sale: String,
}

pub struct PrivatBankAdapter {
    source_id: i32,
    client: Client,
}

impl PrivatBankAdapter {
    pub const KEY: &'static str = "privatbank";

    const URL: &'static str = "https://api.privatbank.ua/p24api/pubinfo?json&exchange&coursid=5";

    pub fn new(source_id: i32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        Self { source_id, client }
    }

    fn scrape_body(&self, body: &str) -> Result<Vec<QuoteRecord>, IngestError> {
        let quotes: Vec<PrivatBankQuote> = serde_json::from_str(body).map_err(|e| {
            IngestError::Malformed(format!("PrivatBank response is not a JSON quote list: {}", e))
        })?;

        if quotes.is_empty() {
            return Err(IngestError::Malformed(
                "PrivatBank returned an empty quote list".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(quotes.len());

        for quote in quotes {
            let buy_rate = quote.buy.trim().parse::<f64>().map_err(|e| {
                IngestError::Malformed(format!(
                    "PrivatBank buy rate \"{}\" is not a number: {}",
                    quote.buy, e
                ))
            })?;

            let sale_rate = quote.sale.trim().parse::<f64>().map_err(|e| {
                IngestError::Malformed(format!(
                    "PrivatBank sale rate \"{}\" is not a number: {}",
                    quote.sale, e
                ))
            })?;

            if !buy_rate.is_finite() || !sale_rate.is_finite() {
                return Err(IngestError::Malformed(format!(
                    "PrivatBank rates for {} are not finite",
                    quote.ccy
                )));
            }

            records.push(QuoteRecord::new(
                self.source_id,
                1,
                quote.ccy,
                quote.base_ccy,
                buy_rate,
                sale_rate,
            ));
        }

        Ok(records.into_iter().filter(Self::keep).collect())
    }

    fn keep(record: &QuoteRecord) -> bool {
        ALLOWED_CURRENCY_CODES.contains(&record.unit_currency_code.as_str())
            && ALLOWED_CURRENCY_CODES.contains(&record.rate_currency_code.as_str())
            && record.buy_rate != 0.0
            && record.sale_rate != 0.0
    }
}

#[async_trait]
impl SourceAdapter for PrivatBankAdapter {
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, IngestError> {
        let response = self.client.get(Self::URL).send().await.map_err(|source| {
            IngestError::Request {
                url: Self::URL.to_string(),
                source,
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            return Err(IngestError::Status {
                url: Self::URL.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| IngestError::Request {
            url: Self::URL.to_string(),
            source,
        })?;

        self.scrape_body(&body)
    }
}
