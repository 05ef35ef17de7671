//! Market data normalization — one wide table keyed by (TICKER, DATE).
//!
//! Every fetch result arrives as a [`QuoteBatch`], so one code path serves
//! one ticker or five hundred: flatten each series into rows, sort by
//! (ticker, date), dedupe on the key, and render the fixed uppercase
//! column set. The adjusted close is dropped here — quotes were requested
//! unadjusted, so it duplicates CLOSE.

use super::provider::{Bar, DataError, QuoteBatch};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Flatten a quote batch into the normalized market data table.
///
/// Output columns: TICKER, DATE, OPEN, HIGH, LOW, CLOSE, VOLUME,
/// DIVIDENDS, STOCK SPLITS. Rows are ordered by (ticker, date) and unique
/// on that key (first occurrence wins). An empty batch yields an empty
/// frame with the full schema.
pub fn market_table(batch: &QuoteBatch) -> Result<DataFrame, DataError> {
    let mut tickers: Vec<String> = Vec::new();
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut opens: Vec<f64> = Vec::new();
    let mut highs: Vec<f64> = Vec::new();
    let mut lows: Vec<f64> = Vec::new();
    let mut closes: Vec<f64> = Vec::new();
    let mut volumes: Vec<u64> = Vec::new();
    let mut dividends: Vec<f64> = Vec::new();
    let mut splits: Vec<f64> = Vec::new();

    let mut series: Vec<_> = batch.series.iter().collect();
    series.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    for s in series {
        // BTreeMap gives date order and key uniqueness in one pass
        let mut by_date: BTreeMap<NaiveDate, &Bar> = BTreeMap::new();
        for bar in &s.bars {
            by_date.entry(bar.date).or_insert(bar);
        }
        for (date, bar) in by_date {
            tickers.push(s.ticker.clone());
            dates.push(date);
            opens.push(bar.open);
            highs.push(bar.high);
            lows.push(bar.low);
            closes.push(bar.close);
            volumes.push(bar.volume);
            dividends.push(bar.dividend);
            splits.push(bar.split);
        }
    }

    let df = DataFrame::new(vec![
        Column::Series(Series::new("TICKER".into(), tickers).into()),
        Column::Series(DateChunked::from_naive_date("DATE".into(), dates).into_series().into()),
        Column::Series(Series::new("OPEN".into(), opens).into()),
        Column::Series(Series::new("HIGH".into(), highs).into()),
        Column::Series(Series::new("LOW".into(), lows).into()),
        Column::Series(Series::new("CLOSE".into(), closes).into()),
        Column::Series(Series::new("VOLUME".into(), volumes).into()),
        Column::Series(Series::new("DIVIDENDS".into(), dividends).into()),
        Column::Series(Series::new("STOCK SPLITS".into(), splits).into()),
    ])?;

    Ok(df)
}
