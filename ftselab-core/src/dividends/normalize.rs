//! Dividend table normalization.
//!
//! Consumes the raw scraped table and produces typed records under the
//! fixed column schema: tickers get the `.L` suffix, the price and impact
//! strings are coerced to numbers, the dividend amount is recomputed from
//! them (the scraped amount text is discarded), and the three day-month
//! date labels are resolved against a [`DateLookup`].

use super::dates::DateLookup;
use crate::data::provider::DataError;
use crate::data::universe::EXCHANGE_SUFFIX;
use crate::html::HtmlTable;
use chrono::NaiveDate;
use polars::prelude::*;

/// Fixed output column schema, in order.
pub const DIVIDEND_COLUMNS: [&str; 10] = [
    "TICKER",
    "NAME",
    "MARKET",
    "SHARE_PRICE",
    "DIVIDEND",
    "TYPE",
    "DIV_IMPACT",
    "DECLARATION_DATE",
    "EX-DIVIDEND_DATE",
    "PAYMENT_DATE",
];

/// One normalized declared-dividend event.
///
/// Date fields are `None` when the scraped label had no match in the
/// lookup window — a documented missing-date sentinel, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct DividendRecord {
    pub ticker: String,
    pub name: String,
    pub market: String,
    /// Share price in pence.
    pub share_price: f64,
    /// Recomputed as `share_price * div_impact`.
    pub dividend: f64,
    pub div_type: String,
    /// Dividend as a fraction of share price.
    pub div_impact: f64,
    pub declaration_date: Option<NaiveDate>,
    pub ex_dividend_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
}

/// Strip one trailing unit character ("p", "%") and parse the rest.
fn parse_unit_suffixed(raw: &str, column: &str) -> Result<f64, DataError> {
    let numeric_parse = || DataError::NumericParse {
        column: column.to_string(),
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let last = trimmed.chars().next_back().ok_or_else(numeric_parse)?;
    let stripped = &trimmed[..trimmed.len() - last.len_utf8()];
    stripped.trim().parse::<f64>().map_err(|_| numeric_parse())
}

/// Normalize the raw scraped table into typed dividend records.
///
/// The source table must carry exactly ten columns, mapped positionally
/// onto [`DIVIDEND_COLUMNS`]. Numeric parse failures fail the whole
/// normalization, naming the column and offending value.
pub fn normalize(table: &HtmlTable, lookup: &DateLookup) -> Result<Vec<DividendRecord>, DataError> {
    if table.headers.len() != DIVIDEND_COLUMNS.len() {
        return Err(DataError::ResponseFormatChanged(format!(
            "{}: expected {} columns, found {}",
            table.url,
            DIVIDEND_COLUMNS.len(),
            table.headers.len()
        )));
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let share_price = parse_unit_suffixed(&row[3], "SHARE_PRICE")?;
        let div_impact = parse_unit_suffixed(&row[6], "DIV_IMPACT")? / 100.0;

        records.push(DividendRecord {
            ticker: format!("{}{EXCHANGE_SUFFIX}", row[0].trim()),
            name: row[1].clone(),
            market: row[2].clone(),
            share_price,
            // Scraped amount text (row[4]) is discarded, not validated
            dividend: share_price * div_impact,
            div_type: row[5].clone(),
            div_impact,
            declaration_date: lookup.earliest(&row[7]),
            ex_dividend_date: lookup.latest(&row[8]),
            payment_date: lookup.latest(&row[9]),
        });
    }

    Ok(records)
}

/// Render normalized records as a polars frame under the fixed schema.
pub fn dividend_table(records: &[DividendRecord]) -> Result<DataFrame, DataError> {
    let tickers: Vec<&str> = records.iter().map(|r| r.ticker.as_str()).collect();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let markets: Vec<&str> = records.iter().map(|r| r.market.as_str()).collect();
    let share_prices: Vec<f64> = records.iter().map(|r| r.share_price).collect();
    let amounts: Vec<f64> = records.iter().map(|r| r.dividend).collect();
    let div_types: Vec<&str> = records.iter().map(|r| r.div_type.as_str()).collect();
    let impacts: Vec<f64> = records.iter().map(|r| r.div_impact).collect();

    let declaration = DateChunked::from_naive_date_options(
        "DECLARATION_DATE".into(),
        records.iter().map(|r| r.declaration_date),
    )
    .into_series();
    let ex_dividend = DateChunked::from_naive_date_options(
        "EX-DIVIDEND_DATE".into(),
        records.iter().map(|r| r.ex_dividend_date),
    )
    .into_series();
    let payment = DateChunked::from_naive_date_options(
        "PAYMENT_DATE".into(),
        records.iter().map(|r| r.payment_date),
    )
    .into_series();

    let df = DataFrame::new(vec![
        Column::Series(Series::new("TICKER".into(), tickers).into()),
        Column::Series(Series::new("NAME".into(), names).into()),
        Column::Series(Series::new("MARKET".into(), markets).into()),
        Column::Series(Series::new("SHARE_PRICE".into(), share_prices).into()),
        Column::Series(Series::new("DIVIDEND".into(), amounts).into()),
        Column::Series(Series::new("TYPE".into(), div_types).into()),
        Column::Series(Series::new("DIV_IMPACT".into(), impacts).into()),
        Column::Series(declaration.into()),
        Column::Series(ex_dividend.into()),
        Column::Series(payment.into()),
    ])?;

    Ok(df)
}
