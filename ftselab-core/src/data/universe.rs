//! Universe resolution — FTSE 100 + FTSE 250 constituents.
//!
//! The universe is the sorted, deduplicated set of London-suffixed tickers
//! the rest of the pipeline operates on. Constituent listing sits behind a
//! trait so the resolution logic can be tested without the network.

use super::provider::DataError;
use crate::html::extract_table;
use std::collections::BTreeSet;
use std::time::Duration;

/// Suffix appended to every base symbol (London Stock Exchange on Yahoo).
pub const EXCHANGE_SUFFIX: &str = ".L";

/// Source of index constituent listings.
pub trait ConstituentSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Base symbols of the FTSE 100 constituents.
    fn ftse100(&self) -> Result<Vec<String>, DataError>;

    /// Base symbols of the FTSE 250 constituents.
    fn ftse250(&self) -> Result<Vec<String>, DataError>;
}

/// The resolved ticker universe: sorted, deduplicated, suffixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    tickers: Vec<String>,
}

impl Universe {
    /// Build a universe from already-suffixed tickers (sorts and dedupes).
    pub fn new(tickers: impl IntoIterator<Item = String>) -> Self {
        let set: BTreeSet<String> = tickers.into_iter().collect();
        Self {
            tickers: set.into_iter().collect(),
        }
    }

    /// Resolve the universe from a constituent source.
    ///
    /// Base symbols containing a separator character are skipped — they are
    /// either malformed or already carry an exchange suffix. Everything else
    /// gets `.L` appended, then the whole set is deduplicated and sorted.
    pub fn resolve(source: &dyn ConstituentSource) -> Result<Self, DataError> {
        log::info!("resolving FTSE 100/250 universe from {}", source.name());
        let mut set = BTreeSet::new();
        for symbol in source.ftse100()?.into_iter().chain(source.ftse250()?) {
            let symbol = symbol.trim();
            if symbol.is_empty() || symbol.contains('.') {
                continue;
            }
            set.insert(format!("{symbol}{EXCHANGE_SUFFIX}"));
        }
        Ok(Self {
            tickers: set.into_iter().collect(),
        })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.binary_search_by(|t| t.as_str().cmp(ticker)).is_ok()
    }
}

const FTSE100_URL: &str = "https://en.wikipedia.org/wiki/FTSE_100_Index";
const FTSE250_URL: &str = "https://en.wikipedia.org/wiki/FTSE_250_Index";
const CONSTITUENTS_SELECTOR: &str = "table#constituents";

/// Constituent listings scraped from the Wikipedia index pages.
pub struct WikipediaConstituents {
    client: reqwest::blocking::Client,
}

impl WikipediaConstituents {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    fn tickers_from(&self, url: &str) -> Result<Vec<String>, DataError> {
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

        let table = extract_table(&body, url, CONSTITUENTS_SELECTOR)?;
        let ticker_idx = table
            .headers
            .iter()
            .position(|h| {
                let h = h.to_ascii_lowercase();
                h == "ticker" || h == "epic"
            })
            .ok_or_else(|| {
                DataError::ResponseFormatChanged(format!(
                    "{url}: constituents table has no Ticker column (headers: {:?})",
                    table.headers
                ))
            })?;

        Ok(table
            .rows
            .into_iter()
            .map(|mut row| row.swap_remove(ticker_idx))
            .collect())
    }
}

impl Default for WikipediaConstituents {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstituentSource for WikipediaConstituents {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn ftse100(&self) -> Result<Vec<String>, DataError> {
        self.tickers_from(FTSE100_URL)
    }

    fn ftse250(&self) -> Result<Vec<String>, DataError> {
        self.tickers_from(FTSE250_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource {
        ftse100: Vec<&'static str>,
        ftse250: Vec<&'static str>,
    }

    impl ConstituentSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn ftse100(&self) -> Result<Vec<String>, DataError> {
            Ok(self.ftse100.iter().map(|s| s.to_string()).collect())
        }

        fn ftse250(&self) -> Result<Vec<String>, DataError> {
            Ok(self.ftse250.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn resolve_sorts_dedupes_and_suffixes() {
        let source = FixedSource {
            ftse100: vec!["VOD", "AZN", "SHEL"],
            ftse250: vec!["GAW", "VOD", "ABDN"],
        };
        let universe = Universe::resolve(&source).unwrap();
        assert_eq!(
            universe.tickers(),
            &["ABDN.L", "AZN.L", "GAW.L", "SHEL.L", "VOD.L"]
        );
    }

    #[test]
    fn resolve_skips_symbols_with_separator() {
        let source = FixedSource {
            ftse100: vec!["BT.A", "VOD"],
            ftse250: vec![],
        };
        let universe = Universe::resolve(&source).unwrap();
        assert_eq!(universe.tickers(), &["VOD.L"]);
    }

    #[test]
    fn resolve_skips_blank_symbols() {
        let source = FixedSource {
            ftse100: vec!["", "  ", "VOD"],
            ftse250: vec![],
        };
        let universe = Universe::resolve(&source).unwrap();
        assert_eq!(universe.len(), 1);
    }

    #[test]
    fn contains_uses_sorted_order() {
        let universe = Universe::new(vec!["B.L".to_string(), "A.L".to_string()]);
        assert!(universe.contains("A.L"));
        assert!(!universe.contains("C.L"));
    }

    #[test]
    fn source_failure_propagates() {
        struct FailingSource;
        impl ConstituentSource for FailingSource {
            fn name(&self) -> &str {
                "failing"
            }
            fn ftse100(&self) -> Result<Vec<String>, DataError> {
                Err(DataError::NetworkUnreachable("offline".into()))
            }
            fn ftse250(&self) -> Result<Vec<String>, DataError> {
                Ok(vec![])
            }
        }
        assert!(Universe::resolve(&FailingSource).is_err());
    }
}
