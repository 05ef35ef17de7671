//! Declared-dividend scraping and normalization.

pub mod dates;
pub mod normalize;
pub mod source;

pub use dates::DateLookup;
pub use normalize::{dividend_table, normalize, DividendRecord, DIVIDEND_COLUMNS};
pub use source::{DividendDataSource, DividendSource};
