use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::dataset::Table;
use crate::summary::{Peak, extract_peak};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

/// Transactions per tap-in hour, ascending by hour. Hours with no
/// transactions are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyCounts {
    pub rows: Vec<HourCount>,
    /// Fill color of the hourly area chart.
    pub color: String,
}

impl HourlyCounts {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Busiest hour; the earliest hour wins a tie.
    pub fn peak(&self) -> Option<Peak<u32>> {
        extract_peak(self.rows.iter().map(|r| (r.hour, r.count)), "peak hour").ok()
    }
}

pub fn hourly_counts(table: &Table, config: &DisplayConfig) -> HourlyCounts {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in table.iter() {
        *counts.entry(record.hour()).or_default() += 1;
    }

    HourlyCounts {
        rows: counts
            .into_iter()
            .map(|(hour, count)| HourCount { hour, count })
            .collect(),
        color: config.hourly_color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{TransactionRecord, parse_timestamp};

    fn at(hours: &[u32]) -> Table {
        hours
            .iter()
            .map(|h| {
                TransactionRecord::new(parse_timestamp(&format!("2023-04-03 {h:02}:15:00")).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_counts_sorted_by_hour() {
        let counts = hourly_counts(&at(&[17, 6, 6, 23, 0]), &DisplayConfig::default());
        let hours: Vec<u32> = counts.rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 6, 17, 23]);
        assert_eq!(counts.rows[1].count, 2);
    }

    #[test]
    fn test_total_equals_row_count() {
        let table = at(&[5, 5, 6, 7, 7, 7, 22]);
        assert_eq!(hourly_counts(&table, &DisplayConfig::default()).total(), table.len());
    }

    #[test]
    fn test_peak_tie_goes_to_earliest_hour() {
        let counts = hourly_counts(&at(&[17, 17, 6, 6, 9]), &DisplayConfig::default());
        assert_eq!(counts.peak(), Some(Peak { key: 6, count: 2 }));
    }

    #[test]
    fn test_color_comes_from_config() {
        let mut config = DisplayConfig::default();
        assert_eq!(hourly_counts(&at(&[8]), &config).color, "#636EFA");
        config.hourly_color = "#123456".to_string();
        assert_eq!(hourly_counts(&at(&[8]), &config).color, "#123456");
    }

    #[test]
    fn test_empty_table() {
        let counts = hourly_counts(&at(&[]), &DisplayConfig::default());
        assert!(counts.is_empty());
        assert_eq!(counts.peak(), None);
    }
}
