//! National Bank of Ukraine: official rates scraped from the public HTML
//! table. The page lists one rate per currency, so buy and sale are equal.

use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

use super::{element_text, QuoteRecord, SourceAdapter, ALLOWED_CURRENCY_CODES};
use crate::error::IngestError;

lazy_static! {
    static ref ROW_SELECTOR: Selector = Selector::parse("table#exchangeRates tbody tr").unwrap();
    static ref CELL_SELECTOR: Selector = Selector::parse("td").unwrap();
}

pub struct NbuAdapter {
    source_id: i32,
    client: Client,
}

impl NbuAdapter {
    pub const KEY: &'static str = "nbu";

    const URL: &'static str = "https://bank.gov.ua/ua/markets/exchangerates";

    pub fn new(source_id: i32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        Self { source_id, client }
    }

    /// Parses the rates table and applies the inclusion predicate.
    fn scrape_body(&self, body: &str) -> Result<Vec<QuoteRecord>, IngestError> {
        let document = Html::parse_document(body);
        let rows: Vec<_> = document.select(&ROW_SELECTOR).collect();

        if rows.is_empty() {
            return Err(IngestError::Malformed(
                "no exchange rate rows found in the NBU page".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();

            // Columns: 2 = currency code, 3 = unit, 5 = rate per unit
            if cells.len() < 5 {
                return Err(IngestError::Malformed(format!(
                    "NBU rate row has {} cells, expected at least 5",
                    cells.len()
                )));
            }

            let unit_currency_code = element_text(&cells[1]);

            let unit = element_text(&cells[2]).parse::<i32>().map_err(|e| {
                IngestError::Malformed(format!("NBU unit is not an integer: {}", e))
            })?;

            // The page prints decimals with a comma separator
            let rate = element_text(&cells[4])
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|e| IngestError::Malformed(format!("NBU rate is not a number: {}", e)))?;

            if !rate.is_finite() {
                return Err(IngestError::Malformed(format!(
                    "NBU rate for {} is not finite",
                    unit_currency_code
                )));
            }

            records.push(QuoteRecord::new(
                self.source_id,
                unit,
                unit_currency_code,
                "UAH".to_string(),
                rate,
                rate,
            ));
        }

        Ok(records.into_iter().filter(Self::keep).collect())
    }

    fn keep(record: &QuoteRecord) -> bool {
        ALLOWED_CURRENCY_CODES.contains(&record.unit_currency_code.as_str())
            && ALLOWED_CURRENCY_CODES.contains(&record.rate_currency_code.as_str())
    }
}

#[async_trait]
impl SourceAdapter for NbuAdapter {
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

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
        <table id="exchangeRates">
            <thead><tr><th>№</th><th>Code</th><th>Unit</th><th>Name</th><th>Rate</th></tr></thead>
            <tbody>
                <tr><td>840</td><td>USD</td><td>1</td><td>US Dollar</td><td>1.01</td></tr>
                <tr><td>978</td><td>EUR</td><td>1</td><td>Euro</td><td>2,02</td></tr>
                <tr><td>985</td><td>PLN</td><td>10</td><td>Zloty</td><td>3.03</td></tr>
            </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_scrape_body_parses_and_filters() {
        let adapter = NbuAdapter::new(7);

        let mut records = adapter.scrape_body(FIXTURE).unwrap();
        records.sort_by(|a, b| a.unit_currency_code.cmp(&b.unit_currency_code));

        // The PLN row is dropped by the predicate, not by the parser
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].source_id, 7);
        assert_eq!(records[0].unit_currency_code, "EUR");
        assert_eq!(records[0].rate_currency_code, "UAH");
        assert_eq!(records[0].unit, 1);
        assert_eq!(records[0].buy_rate, 2.02);
        assert_eq!(records[0].sale_rate, 2.02);

        assert_eq!(records[1].unit_currency_code, "USD");
        assert_eq!(records[1].buy_rate, 1.01);
        assert_eq!(records[1].sale_rate, 1.01);
    }

    #[test]
    fn test_scrape_body_fails_on_page_without_rows() {
        let adapter = NbuAdapter::new(7);

        let result = adapter.scrape_body("<html><body><p>maintenance</p></body></html>");

        assert!(matches!(result, Err(IngestError::Malformed(_))));
    }

    #[test]
    fn test_scrape_body_fails_on_non_numeric_rate() {
        let adapter = NbuAdapter::new(7);

        let body = r#"
            <table id="exchangeRates"><tbody>
                <tr><td>840</td><td>USD</td><td>1</td><td>US Dollar</td><td>n/a</td></tr>
            </tbody></table>
        "#;

        assert!(matches!(
            adapter.scrape_body(body),
            Err(IngestError::Malformed(_))
        ));
    }
}
