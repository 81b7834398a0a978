//! Sidebar filters and the options they are chosen from.

use std::collections::{BTreeSet, HashSet};
use std::convert::Infallible;
use std::str::FromStr;

use chrono::Weekday;
use serde::Serialize;
use tracing::debug;

use crate::dataset::{Table, TransactionRecord, day_name};

/// Label of the "no corridor filter" choice.
pub const ALL_CORRIDORS: &str = "All";

/// Corridor selector: either the sentinel for every corridor or one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorridorSelector {
    #[default]
    All,
    Named(String),
}

impl FromStr for CorridorSelector {
    type Err = Infallible;

    /// `"All"` (any case) selects every corridor; anything else is a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL_CORRIDORS) {
            Ok(CorridorSelector::All)
        } else {
            Ok(CorridorSelector::Named(s.to_string()))
        }
    }
}

/// The three independent predicates. A default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub day: Option<Weekday>,
    pub corridor: CorridorSelector,
    pub banks: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn is_identity(&self) -> bool {
        self.day.is_none() && self.corridor == CorridorSelector::All && self.banks.is_empty()
    }

    fn matches(&self, record: &TransactionRecord) -> bool {
        if let Some(day) = self.day {
            if record.weekday() != day {
                return false;
            }
        }

        if let CorridorSelector::Named(name) = &self.corridor {
            if record.corridor_name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }

        if !self.banks.is_empty() {
            match &record.pay_card_bank {
                Some(bank) if self.banks.contains(bank) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Returns the rows of `table` that satisfy every active predicate in
/// `criteria`. The input table is left untouched.
pub fn apply_filters(table: &Table, criteria: &FilterCriteria) -> Table {
    if criteria.is_identity() {
        return table.clone();
    }

    let selection: Vec<usize> = table
        .iter_with_ids()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(id, _)| id)
        .collect();

    debug!(
        before = table.len(),
        after = selection.len(),
        day = criteria.day.map(day_name),
        corridor = ?criteria.corridor,
        banks = criteria.banks.len(),
        "Filters applied"
    );

    table.select(selection)
}

/// Distinct values offered by the sidebar, each in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOptions {
    pub days: Vec<String>,
    /// Starts with [`ALL_CORRIDORS`].
    pub corridors: Vec<String>,
    pub banks: Vec<String>,
}

impl SelectionOptions {
    pub fn from_table(table: &Table) -> Self {
        let mut seen_days = HashSet::new();
        let mut seen_corridors = HashSet::new();
        let mut seen_banks = HashSet::new();

        let mut days = Vec::new();
        let mut corridors = vec![ALL_CORRIDORS.to_string()];
        let mut banks = Vec::new();

        for record in table.iter() {
            let day = record.weekday();
            if seen_days.insert(day) {
                days.push(day_name(day).to_string());
            }
            if let Some(name) = &record.corridor_name {
                if seen_corridors.insert(name.as_str()) {
                    corridors.push(name.clone());
                }
            }
            if let Some(bank) = &record.pay_card_bank {
                if seen_banks.insert(bank.as_str()) {
                    banks.push(bank.clone());
                }
            }
        }

        Self {
            days,
            corridors,
            banks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_timestamp;

    // 2023-04-03 is a Monday.
    fn record(ts: &str, corridor: Option<&str>, bank: Option<&str>) -> TransactionRecord {
        let mut r = TransactionRecord::new(parse_timestamp(ts).unwrap());
        r.corridor_name = corridor.map(str::to_string);
        r.pay_card_bank = bank.map(str::to_string);
        r
    }

    fn sample() -> Table {
        Table::new(vec![
            record("2023-04-03 06:00:00", Some("1"), Some("emoney")),
            record("2023-04-03 07:00:00", Some("2"), Some("dki")),
            record("2023-04-04 08:00:00", Some("1"), Some("dki")),
            record("2023-04-04 09:00:00", None, None),
            record("2023-04-05 10:00:00", Some("1"), Some("flazz")),
        ])
    }

    fn banks(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_identity_filter_returns_every_row() {
        let table = sample();
        let out = apply_filters(&table, &FilterCriteria::default());
        assert_eq!(out, table);
    }

    #[test]
    fn test_day_filter_uses_tap_in_weekday() {
        let criteria = FilterCriteria {
            day: Some(Weekday::Tue),
            ..Default::default()
        };
        let out = apply_filters(&sample(), &criteria);
        assert_eq!(out.row_ids(), &[2, 3]);
    }

    #[test]
    fn test_corridor_filter_exact_match_skips_nulls() {
        let criteria = FilterCriteria {
            corridor: CorridorSelector::Named("1".into()),
            ..Default::default()
        };
        let out = apply_filters(&sample(), &criteria);
        assert_eq!(out.row_ids(), &[0, 2, 4]);
    }

    #[test]
    fn test_bank_filter_is_set_membership() {
        let criteria = FilterCriteria {
            banks: banks(&["dki", "flazz"]),
            ..Default::default()
        };
        let out = apply_filters(&sample(), &criteria);
        assert_eq!(out.row_ids(), &[1, 2, 4]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let table = sample();
        let day_only = FilterCriteria {
            day: Some(Weekday::Mon),
            ..Default::default()
        };
        let bank_only = FilterCriteria {
            banks: banks(&["dki"]),
            ..Default::default()
        };
        let both = FilterCriteria {
            day: Some(Weekday::Mon),
            banks: banks(&["dki"]),
            ..Default::default()
        };

        let a: BTreeSet<usize> = apply_filters(&table, &day_only).row_ids().iter().copied().collect();
        let b: BTreeSet<usize> = apply_filters(&table, &bank_only).row_ids().iter().copied().collect();
        let expected: Vec<usize> = a.intersection(&b).copied().collect();

        assert_eq!(apply_filters(&table, &both).row_ids(), expected.as_slice());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let table = sample();
        let criteria = FilterCriteria {
            day: Some(Weekday::Mon),
            corridor: CorridorSelector::Named("2".into()),
            banks: banks(&["dki"]),
        };
        let once = apply_filters(&table, &criteria);
        let twice = apply_filters(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(once.row_ids(), &[1]);
    }

    #[test]
    fn test_input_table_is_not_mutated() {
        let table = sample();
        let criteria = FilterCriteria {
            day: Some(Weekday::Sun),
            ..Default::default()
        };
        let out = apply_filters(&table, &criteria);
        assert!(out.is_empty());
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_corridor_selector_parses_sentinel() {
        assert_eq!("all".parse::<CorridorSelector>().unwrap(), CorridorSelector::All);
        assert_eq!(
            "Blok M - Kota".parse::<CorridorSelector>().unwrap(),
            CorridorSelector::Named("Blok M - Kota".into())
        );
    }

    #[test]
    fn test_selection_options_first_seen_order() {
        let options = SelectionOptions::from_table(&sample());
        assert_eq!(options.days, vec!["Monday", "Tuesday", "Wednesday"]);
        assert_eq!(options.corridors, vec![ALL_CORRIDORS, "1", "2"]);
        assert_eq!(options.banks, vec!["emoney", "dki", "flazz"]);
    }
}
