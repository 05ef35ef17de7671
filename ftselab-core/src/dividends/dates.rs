//! Day-month label resolution.
//!
//! dividenddata.co.uk publishes its three date columns as bare "DD-Mon"
//! labels ("15-Mar") with no year. The lookup table enumerates every
//! calendar day from one year before a reference date to one year after,
//! so a label matches at most twice. Declaration dates take the earliest
//! match, ex-dividend and payment dates the latest — the upstream site
//! lists declarations in the recent past and payments in the near future.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Label format used by the dividend source.
pub const LABEL_FORMAT: &str = "%d-%b";

/// Mapping from a "DD-Mon" label to the concrete dates carrying it.
#[derive(Debug, Clone)]
pub struct DateLookup {
    // Dates per label, sorted ascending; at most two entries per label.
    by_label: BTreeMap<String, Vec<NaiveDate>>,
}

impl DateLookup {
    /// Build the lookup over `[today - 365 days, today + 365 days]`.
    pub fn around(today: NaiveDate) -> Self {
        let start = today - Duration::days(365);
        let end = today + Duration::days(365);

        let mut by_label: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
        let mut day = start;
        while day <= end {
            by_label
                .entry(day.format(LABEL_FORMAT).to_string())
                .or_default()
                .push(day);
            day += Duration::days(1);
        }

        Self { by_label }
    }

    /// Earliest concrete date carrying `label`, if any.
    pub fn earliest(&self, label: &str) -> Option<NaiveDate> {
        self.by_label
            .get(label.trim())
            .and_then(|dates| dates.first().copied())
    }

    /// Latest concrete date carrying `label`, if any.
    pub fn latest(&self, label: &str) -> Option<NaiveDate> {
        self.by_label
            .get(label.trim())
            .and_then(|dates| dates.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duplicate_label_resolves_asymmetrically() {
        // Window around mid-2024 contains both 2024-01-01 and 2025-01-01
        let lookup = DateLookup::around(ymd(2024, 6, 15));
        assert_eq!(lookup.earliest("01-Jan"), Some(ymd(2024, 1, 1)));
        assert_eq!(lookup.latest("01-Jan"), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn unique_label_resolves_identically_both_ways() {
        // Every ordinary label appears twice in the two-year window, but
        // 29-Feb appears only once when a single leap year is covered
        let lookup = DateLookup::around(ymd(2024, 6, 15));
        assert_eq!(lookup.earliest("29-Feb"), Some(ymd(2024, 2, 29)));
        assert_eq!(lookup.earliest("29-Feb"), lookup.latest("29-Feb"));
    }

    #[test]
    fn unmatched_label_is_none_not_a_crash() {
        // No Feb 29 in [2021-06-15, 2023-06-15]
        let lookup = DateLookup::around(ymd(2022, 6, 15));
        assert_eq!(lookup.earliest("29-Feb"), None);
        assert_eq!(lookup.latest("29-Feb"), None);
        assert_eq!(lookup.earliest("not-a-date"), None);
    }

    #[test]
    fn labels_are_trimmed_before_lookup() {
        let lookup = DateLookup::around(ymd(2024, 6, 15));
        assert_eq!(lookup.earliest(" 01-Jan "), lookup.earliest("01-Jan"));
    }
}
