//! FTSELab Core — FTSE 100/250 market data retrieval and normalization.
//!
//! This crate pulls together three data concerns:
//! - Universe resolution (FTSE 100 + FTSE 250 constituents, `.L`-suffixed)
//! - Declared-dividend scraping and normalization (optional, behind a flag)
//! - Daily OHLCV + corporate-action download and reshaping into one wide table
//!
//! Each stage is a pure function from inputs to outputs; the [`pipeline`]
//! module chains them. Network-facing collaborators sit behind traits
//! ([`data::ConstituentSource`], [`data::QuoteProvider`],
//! [`dividends::DividendSource`]) so tests can mock them.

pub mod data;
pub mod dividends;
pub mod html;
pub mod pipeline;

pub use data::provider::{Bar, DataError, QuoteBatch, QuoteProvider, TickerSeries};
pub use data::universe::{ConstituentSource, Universe};
pub use pipeline::{run, MarketDataset, PipelineConfig};
