//! Quote provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over the historical-quote source
//! (Yahoo Finance in production) so the normalizer and pipeline can be
//! tested against mock batches.

use super::schema::SchemaError;
use super::universe::Universe;
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily bar for one ticker, corporate actions included.
///
/// `adj_close` is carried through the fetch but deliberately dropped by the
/// normalizer: quotes are requested unadjusted, so the adjusted close is
/// redundant with `close`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
    /// Cash dividend that went ex on this date, 0.0 on ordinary days.
    pub dividend: f64,
    /// Split ratio effective on this date (e.g. 4.0 for a 4:1), 0.0 otherwise.
    pub split: f64,
}

/// Daily series for a single ticker.
#[derive(Debug, Clone)]
pub struct TickerSeries {
    pub ticker: String,
    pub bars: Vec<Bar>,
}

/// A batch of one or more ticker series.
///
/// This is the single representation for every fetch result regardless of
/// how many tickers were requested — the normalizer has no single-ticker
/// special case.
#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    pub series: Vec<TickerSeries>,
}

impl QuoteBatch {
    pub fn new(series: Vec<TickerSeries>) -> Self {
        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.bars.is_empty())
    }
}

/// Structured error types for the data layer.
///
/// Upstream-schema faults name the offending source; availability faults
/// surface the transport error unchanged; data-shape faults name the
/// column and value that failed to parse.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no table matching `{selector}` at {url}")]
    TableNotFound { url: String, selector: String },

    #[error("{url}: row {row} has {got} cells, expected {expected}")]
    ColumnCountMismatch {
        url: String,
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("column {column}: cannot parse number from {value:?}")]
    NumericParse { column: String, value: String },

    #[error("universe is empty — nothing to fetch")]
    EmptyUniverse,

    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for batched historical-quote providers.
///
/// Implementations fetch daily OHLCV-plus-actions series for every ticker
/// in the universe over `[start, end)`. Per-ticker gaps (delisted symbols,
/// empty histories) come back as empty series rather than failing the
/// batch; transport failures are fatal.
pub trait QuoteProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for every ticker in the universe.
    fn fetch_batch(
        &self,
        universe: &Universe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<QuoteBatch, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_detection() {
        let batch = QuoteBatch::new(vec![TickerSeries {
            ticker: "AAA.L".into(),
            bars: vec![],
        }]);
        assert!(batch.is_empty());
        assert!(QuoteBatch::default().is_empty());
    }

    #[test]
    fn errors_name_the_offending_source() {
        let err = DataError::TableNotFound {
            url: "https://example.com/divs".into(),
            selector: "table.table.table-striped".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("example.com"));
        assert!(msg.contains("table-striped"));
    }
}
