//! UkrSibBank branch rates scraped from the cash-exchange page. The page
//! refuses requests without a browser-looking User-Agent.

use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use super::{element_text, QuoteRecord, SourceAdapter, ALLOWED_CURRENCY_CODES};
use crate::error::IngestError;

lazy_static! {
    static ref ITEM_SELECTOR: Selector =
        Selector::parse("div#kassa ul li.module-exchange__item").unwrap();
    static ref CURRENCY_SELECTOR: Selector =
        Selector::parse("div.module-exchange__item-currency div.module-exchange__item-text")
            .unwrap();
    static ref VALUE_SELECTOR: Selector = Selector::parse("div.module-exchange__item-value").unwrap();
    static ref VALUE_TEXT_SELECTOR: Selector = Selector::parse("span").unwrap();
}

pub struct UkrSibBankAdapter {
    source_id: i32,
    client: Client,
}

impl UkrSibBankAdapter {
    pub const KEY: &'static str = "ukrsibbank";

    const URL: &'static str = "https://ukrsibbank.com/currency-cash/";

    const USER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

    pub fn new(source_id: i32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(Self::USER_AGENT)
            .build()
            .unwrap();

        Self { source_id, client }
    }

    fn scrape_body(&self, body: &str) -> Result<Vec<QuoteRecord>, IngestError> {
        let document = Html::parse_document(body);
        let items: Vec<_> = document.select(&ITEM_SELECTOR).collect();

        if items.is_empty() {
            return Err(IngestError::Malformed(
                "no exchange items found in the UkrSibBank page".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(items.len());

        for item in items {
            let currency_cell = item.select(&CURRENCY_SELECTOR).next().ok_or_else(|| {
                IngestError::Malformed("UkrSibBank item has no currency cell".to_string())
            })?;

            // The cell's own text is the code; a nested span holds the full name
            let unit_currency_code = own_text(&currency_cell);

            let values: Vec<_> = item.select(&VALUE_SELECTOR).collect();

            // Value cells: 2nd is the buy rate, 4th is the sale rate
            if values.len() < 4 {
                return Err(IngestError::Malformed(format!(
                    "UkrSibBank item has {} value cells, expected at least 4",
                    values.len()
                )));
            }

            let buy_rate = Self::value_rate(&values[1])?;
            let sale_rate = Self::value_rate(&values[3])?;

            records.push(QuoteRecord::new(
                self.source_id,
                1,
                unit_currency_code,
                "UAH".to_string(),
                buy_rate,
                sale_rate,
            ));
        }

        Ok(records.into_iter().filter(Self::keep).collect())
    }

    fn value_rate(value: &ElementRef) -> Result<f64, IngestError> {
        let span = value.select(&VALUE_TEXT_SELECTOR).next().ok_or_else(|| {
            IngestError::Malformed("UkrSibBank value cell has no rate span".to_string())
        })?;

        let rate = element_text(&span).parse::<f64>().map_err(|e| {
            IngestError::Malformed(format!("UkrSibBank rate is not a number: {}", e))
        })?;

        if !rate.is_finite() {
            return Err(IngestError::Malformed(
                "UkrSibBank rate is not finite".to_string(),
            ));
        }

        Ok(rate)
    }

    fn keep(record: &QuoteRecord) -> bool {
        ALLOWED_CURRENCY_CODES.contains(&record.unit_currency_code.as_str())
            && ALLOWED_CURRENCY_CODES.contains(&record.rate_currency_code.as_str())
            && record.buy_rate != 0.0
            && record.sale_rate != 0.0
    }
}

#[async_trait]
impl SourceAdapter for UkrSibBankAdapter {
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

/// Text of the element's direct text nodes only, nested elements excluded.
fn own_text(element: &ElementRef) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
