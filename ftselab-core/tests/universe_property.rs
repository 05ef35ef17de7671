//! Property tests for universe resolution.

use ftselab_core::data::provider::DataError;
use ftselab_core::data::universe::{ConstituentSource, Universe};
use proptest::prelude::*;

struct VecSource {
    ftse100: Vec<String>,
    ftse250: Vec<String>,
}

impl ConstituentSource for VecSource {
    fn name(&self) -> &str {
        "vec"
    }

    fn ftse100(&self) -> Result<Vec<String>, DataError> {
        Ok(self.ftse100.clone())
    }

    fn ftse250(&self) -> Result<Vec<String>, DataError> {
        Ok(self.ftse250.clone())
    }
}

fn symbol() -> impl Strategy<Value = String> {
    // Base symbols as listed upstream: short uppercase strings, sometimes
    // carrying a separator that resolution must filter out
    prop_oneof![
        "[A-Z]{1,4}",
        "[A-Z]{1,3}\\.[A-Z]",
    ]
}

proptest! {
    #[test]
    fn resolution_is_sorted_deduped_and_suffixed(
        ftse100 in prop::collection::vec(symbol(), 0..20),
        ftse250 in prop::collection::vec(symbol(), 0..20),
    ) {
        let source = VecSource { ftse100, ftse250 };
        let universe = Universe::resolve(&source).unwrap();
        let tickers = universe.tickers();

        // Sorted, no duplicates
        for pair in tickers.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }

        // Every ticker ends with the suffix and has no separator before it
        for ticker in tickers {
            prop_assert!(ticker.ends_with(".L"));
            let base = &ticker[..ticker.len() - 2];
            prop_assert!(!base.contains('.'));
            prop_assert!(!base.is_empty());
        }
    }

    #[test]
    fn resolution_is_deterministic(
        ftse100 in prop::collection::vec(symbol(), 0..20),
        ftse250 in prop::collection::vec(symbol(), 0..20),
    ) {
        let source = VecSource { ftse100, ftse250 };
        let first = Universe::resolve(&source).unwrap();
        let second = Universe::resolve(&source).unwrap();
        prop_assert_eq!(first, second);
    }
}
