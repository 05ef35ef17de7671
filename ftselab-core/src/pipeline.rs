//! Pipeline orchestration.
//!
//! Stages run strictly in sequence, each a pure function of the previous
//! stage's output: resolve universe → (optionally) fetch and normalize
//! dividends → fetch and normalize market data. No stage reads shared
//! mutable state; the caller owns everything that flows between them.

use crate::data::provider::{DataError, QuoteProvider};
use crate::data::schema::MarketSchema;
use crate::data::table::market_table;
use crate::data::universe::{ConstituentSource, Universe};
use crate::dividends::dates::DateLookup;
use crate::dividends::normalize::{dividend_table, normalize};
use crate::dividends::source::DividendSource;
use chrono::NaiveDate;
use polars::prelude::DataFrame;

/// Caller-supplied run parameters.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Start of the market data range (inclusive).
    pub start: NaiveDate,
    /// End of the market data range (exclusive).
    pub end: NaiveDate,
    /// When false, the dividend source is never contacted and no dividend
    /// table is produced.
    pub pull_dividends: bool,
}

/// Everything one pipeline run produces.
#[derive(Debug)]
pub struct MarketDataset {
    pub universe: Universe,
    /// Wide market table keyed by (TICKER, DATE).
    pub market: DataFrame,
    /// Normalized dividend table; `None` when the pull flag was off.
    pub dividends: Option<DataFrame>,
}

/// Run the full pipeline.
pub fn run(
    config: &PipelineConfig,
    constituents: &dyn ConstituentSource,
    quotes: &dyn QuoteProvider,
    dividends: &dyn DividendSource,
) -> Result<MarketDataset, DataError> {
    let universe = Universe::resolve(constituents)?;
    log::info!("universe resolved: {} tickers", universe.len());

    let dividends = if config.pull_dividends {
        let raw = dividends.fetch()?;
        let lookup = DateLookup::around(chrono::Local::now().date_naive());
        let records = normalize(&raw, &lookup)?;
        log::info!("normalized {} declared dividends", records.len());
        Some(dividend_table(&records)?)
    } else {
        None
    };

    log::info!(
        "downloading market data from {} for {} .. {}",
        quotes.name(),
        config.start,
        config.end
    );
    let batch = quotes.fetch_batch(&universe, config.start, config.end)?;
    let market = market_table(&batch)?;
    MarketSchema::validate(&market)?;

    Ok(MarketDataset {
        universe,
        market,
        dividends,
    })
}
