//! Yahoo Finance quote provider.
//!
//! Fetches daily OHLCV bars plus corporate actions from Yahoo's v8 chart
//! API, one request per ticker, unadjusted prices. Yahoo has no official
//! API and is subject to unannounced format changes; every shape surprise
//! surfaces as [`DataError::ResponseFormatChanged`].

use super::provider::{Bar, DataError, QuoteBatch, QuoteProvider, TickerSeries};
use super::universe::Universe;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Events {
    dividends: Option<HashMap<String, DividendEvent>>,
    splits: Option<HashMap<String, SplitEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

/// Yahoo Finance batched quote provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Build the chart API URL for a ticker and date range.
    ///
    /// `events=div|split` pulls corporate actions alongside the quote
    /// arrays; adjusted close is requested too but dropped downstream.
    fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &events=div%7Csplit&includeAdjustedClose=true"
        )
    }

    /// Parse a chart API response into daily bars.
    fn parse_chart(ticker: &str, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: ticker.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let (dividends, splits) = index_events(data.events)?;

        let n = timestamps.len();
        let mut bars = Vec::with_capacity(n);

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());

            // Skip rows where all OHLCV are null (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            bars.push(Bar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                adj_close: adj_close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
                dividend: dividends.get(&date).copied().unwrap_or(0.0),
                split: splits.get(&date).copied().unwrap_or(0.0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }

        Ok(bars)
    }

    fn fetch_one(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError> {
        let url = Self::chart_url(ticker, start, end);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        Self::parse_chart(ticker, chart)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse the events map into per-date dividend amounts and split ratios.
fn index_events(
    events: Option<Events>,
) -> Result<(HashMap<NaiveDate, f64>, HashMap<NaiveDate, f64>), DataError> {
    let mut dividends = HashMap::new();
    let mut splits = HashMap::new();

    let Some(events) = events else {
        return Ok((dividends, splits));
    };

    let to_date = |ts: i64| {
        chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid event timestamp: {ts}")))
    };

    for ev in events.dividends.unwrap_or_default().into_values() {
        dividends.insert(to_date(ev.date)?, ev.amount);
    }
    for ev in events.splits.unwrap_or_default().into_values() {
        let ratio = if ev.denominator != 0.0 {
            ev.numerator / ev.denominator
        } else {
            0.0
        };
        splits.insert(to_date(ev.date)?, ratio);
    }

    Ok((dividends, splits))
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    /// Fetch every ticker in the universe.
    ///
    /// Tickers Yahoo no longer knows come back as empty series with a
    /// warning — the batch is best-effort per ticker, matching the
    /// provider's own behavior. Transport failures abort the whole batch.
    fn fetch_batch(
        &self,
        universe: &Universe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<QuoteBatch, DataError> {
        if universe.is_empty() {
            return Err(DataError::EmptyUniverse);
        }

        let mut series = Vec::with_capacity(universe.len());
        for ticker in universe.tickers() {
            match self.fetch_one(ticker, start, end) {
                Ok(bars) => series.push(TickerSeries {
                    ticker: ticker.clone(),
                    bars,
                }),
                Err(DataError::SymbolNotFound { symbol }) => {
                    log::warn!("[{symbol}] no price data returned; keeping an empty series");
                    series.push(TickerSeries {
                        ticker: ticker.clone(),
                        bars: vec![],
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(QuoteBatch::new(series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, null, 102.0],
                        "high":   [105.0, null, 107.0],
                        "low":    [ 99.0, null, 101.0],
                        "close":  [103.0, null, 106.0],
                        "volume": [1000,  null, 2000]
                    }],
                    "adjclose": [{ "adjclose": [103.0, null, 106.0] }]
                },
                "events": {
                    "dividends": {
                        "1704326400": { "amount": 0.25, "date": 1704326400 }
                    },
                    "splits": {
                        "1704153600": { "date": 1704153600, "numerator": 4.0, "denominator": 1.0 }
                    }
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_bars_and_actions() {
        let resp: ChartResponse = serde_json::from_str(CHART_JSON).unwrap();
        let bars = YahooProvider::parse_chart("VOD.L", resp).unwrap();

        // The all-null middle row is a non-trading day and gets skipped
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].split, 4.0);
        assert_eq!(bars[0].dividend, 0.0);
        assert_eq!(bars[1].dividend, 0.25);
        assert_eq!(bars[1].split, 0.0);
        assert_eq!(bars[1].volume, 2000);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"no data"}}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_chart("GONE.L", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn missing_result_is_a_format_change() {
        let json = r#"{"chart":{"result":null,"error":null}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_chart("VOD.L", resp).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn chart_url_includes_actions_and_daily_interval() {
        let url = YahooProvider::chart_url(
            "VOD.L",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert!(url.contains("/chart/VOD.L"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("events=div%7Csplit"));
    }
}
