//! Declared-dividend source — dividenddata.co.uk.
//!
//! Two fixed pages, one per index. The site rejects default HTTP clients,
//! so the request carries a browser user-agent. Rows from the FTSE 100
//! page land before the FTSE 250 page, order preserved within each.

use crate::data::provider::DataError;
use crate::html::{extract_table, HtmlTable};
use std::time::Duration;

const SOURCE_URLS: [&str; 2] = [
    "https://www.dividenddata.co.uk/exdividenddate.py?m=ftse100",
    "https://www.dividenddata.co.uk/exdividenddate.py?m=ftse250",
];

/// The dividend table lives in the page's only striped bootstrap table.
const TABLE_SELECTOR: &str = "table.table.table-striped";

/// Source of the raw declared-dividend table.
pub trait DividendSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch and concatenate the raw dividend tables.
    fn fetch(&self) -> Result<HtmlTable, DataError>;
}

/// Live scraper for dividenddata.co.uk.
pub struct DividendDataSource {
    client: reqwest::blocking::Client,
}

impl DividendDataSource {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    fn fetch_page(&self, url: &str) -> Result<HtmlTable, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        extract_table(&body, url, TABLE_SELECTOR)
    }
}

impl Default for DividendDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DividendSource for DividendDataSource {
    fn name(&self) -> &str {
        "dividenddata"
    }

    fn fetch(&self) -> Result<HtmlTable, DataError> {
        log::info!("scraping declared dividends from dividenddata.co.uk");
        let mut pages = SOURCE_URLS.iter();
        // Both pages share one schema; the first page's headers win
        let first_url = pages.next().expect("SOURCE_URLS is non-empty");
        let mut table = self.fetch_page(first_url)?;
        for url in pages {
            table.append(self.fetch_page(url)?)?;
        }
        Ok(table)
    }
}
