//! Canonical market table schema and validation.

use polars::prelude::*;

/// Expected shape of the normalized market data table.
pub struct MarketSchema;

impl MarketSchema {
    /// Columns every market table must carry.
    pub const REQUIRED: [&'static str; 7] =
        ["TICKER", "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"];

    /// The adjusted-close field the normalizer must have dropped.
    pub const DROPPED: &'static str = "ADJ CLOSE";

    /// Validate a normalized market table.
    ///
    /// Checks that every required column is present, every column name is
    /// uppercase, and the dropped adjusted-close column did not sneak back.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        for required in Self::REQUIRED {
            if !names.iter().any(|n| n == required) {
                return Err(SchemaError::MissingColumn(required.to_string()));
            }
        }

        for name in &names {
            if name.to_uppercase() != *name {
                return Err(SchemaError::NotUppercase(name.clone()));
            }
        }

        if names.iter().any(|n| n == Self::DROPPED) {
            return Err(SchemaError::DroppedColumnPresent(Self::DROPPED.to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column name is not uppercase: {0}")]
    NotUppercase(String),

    #[error("column should have been dropped but is present: {0}")]
    DroppedColumnPresent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_frame() -> DataFrame {
        df!(
            "TICKER" => &["VOD.L"],
            "DATE" => &["2024-01-02"],
            "OPEN" => &[100.0],
            "HIGH" => &[105.0],
            "LOW" => &[99.0],
            "CLOSE" => &[103.0],
            "VOLUME" => &[1000.0],
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_frame() {
        assert!(MarketSchema::validate(&valid_frame()).is_ok());
    }

    #[test]
    fn rejects_missing_column() {
        let df = valid_frame().drop("CLOSE").unwrap();
        let err = MarketSchema::validate(&df).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(c) if c == "CLOSE"));
    }

    #[test]
    fn rejects_lowercase_column() {
        let mut df = valid_frame();
        df.rename("OPEN", "open".into()).unwrap();
        let err = MarketSchema::validate(&df).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(_) | SchemaError::NotUppercase(_)));
    }

    #[test]
    fn rejects_surviving_adj_close() {
        let mut df = valid_frame();
        df.with_column(Series::new("ADJ CLOSE".into(), &[103.0]))
            .unwrap();
        let err = MarketSchema::validate(&df).unwrap_err();
        assert!(matches!(err, SchemaError::DroppedColumnPresent(_)));
    }
}
