//! FTSELab CLI — pull and normalize FTSE 100/250 market data.
//!
//! Resolves the ticker universe, optionally scrapes declared dividends,
//! downloads daily OHLCV + corporate actions from Yahoo Finance, and
//! prints the normalized tables.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use ftselab_core::data::{WikipediaConstituents, YahooProvider};
use ftselab_core::dividends::DividendDataSource;
use ftselab_core::pipeline::{run, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "ftselab",
    about = "FTSELab — FTSE 100/250 market data and dividend pipeline"
)]
struct Cli {
    /// Start date (YYYY-MM-DD). Defaults to one year ago.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<String>,

    /// Also scrape declared dividends from dividenddata.co.uk.
    #[arg(long, default_value_t = false)]
    dividends: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = cli
        .start
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive() - chrono::Duration::days(365));

    let end = cli
        .end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let config = PipelineConfig {
        start,
        end,
        pull_dividends: cli.dividends,
    };

    let constituents = WikipediaConstituents::new();
    let quotes = YahooProvider::new();
    let dividend_source = DividendDataSource::new();

    let dataset = run(&config, &constituents, &quotes, &dividend_source)?;

    println!(
        "Universe: {} tickers | market rows: {}",
        dataset.universe.len(),
        dataset.market.height()
    );
    println!("{}", dataset.market.head(Some(8)));

    if let Some(dividends) = &dataset.dividends {
        println!("Declared dividends: {} rows", dividends.height());
        println!("{}", dividends.head(Some(8)));
    }

    Ok(())
}
