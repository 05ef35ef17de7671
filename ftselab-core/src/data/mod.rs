//! Market data retrieval and normalization.

pub mod provider;
pub mod schema;
pub mod table;
pub mod universe;
pub mod yahoo;

pub use provider::{Bar, DataError, QuoteBatch, QuoteProvider, TickerSeries};
pub use schema::{MarketSchema, SchemaError};
pub use table::market_table;
pub use universe::{ConstituentSource, Universe, WikipediaConstituents};
pub use yahoo::YahooProvider;
