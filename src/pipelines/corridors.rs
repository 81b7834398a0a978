use std::collections::HashMap;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::dataset::Table;
use crate::summary::{Peak, extract_peak};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorridorCount {
    pub corridor: String,
    pub count: usize,
    /// Palette color picked by rank, so it follows position rather than name.
    pub color: Option<String>,
}

/// Most used corridors, descending by count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopCorridors {
    pub rows: Vec<CorridorCount>,
}

impl TopCorridors {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first row, which has the highest count by construction.
    pub fn peak(&self) -> Option<Peak<String>> {
        extract_peak(
            self.rows.iter().map(|r| (r.corridor.clone(), r.count)),
            "top corridor",
        )
        .ok()
    }
}

/// Counts transactions per corridor name and keeps the `top_corridors`
/// largest. Rows without a corridor name are ignored; equal counts keep the
/// order in which the corridors first appear in the table.
pub fn top_corridors(table: &Table, config: &DisplayConfig) -> TopCorridors {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for name in table.iter().filter_map(|r| r.corridor_name.as_deref()) {
        match index.get(name) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(name, order.len());
                order.push((name, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(config.top_corridors);

    TopCorridors {
        rows: order
            .into_iter()
            .enumerate()
            .map(|(rank, (corridor, count))| CorridorCount {
                corridor: corridor.to_string(),
                count,
                color: config.corridor_color(rank).map(str::to_string),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{TransactionRecord, parse_timestamp};

    fn corridors(names: &[Option<&str>]) -> Table {
        let ts = parse_timestamp("2023-04-03 07:00:00").unwrap();
        names
            .iter()
            .map(|n| {
                let mut r = TransactionRecord::new(ts);
                r.corridor_name = n.map(str::to_string);
                r
            })
            .collect()
    }

    #[test]
    fn test_sorted_descending_with_encounter_tiebreak() {
        let table = corridors(&[Some("B"), Some("A"), Some("C"), Some("A"), Some("C"), None]);
        let top = top_corridors(&table, &DisplayConfig::default());
        let names: Vec<&str> = top.rows.iter().map(|r| r.corridor.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
        assert_eq!(top.peak(), Some(Peak { key: "A".into(), count: 2 }));
    }

    #[test]
    fn test_truncates_to_top_n_and_colors_by_rank() {
        let names: Vec<String> = (0..15).map(|i| format!("K{i}")).collect();
        let mut rows: Vec<Option<&str>> = Vec::new();
        for (i, name) in names.iter().enumerate() {
            for _ in 0..(20 - i) {
                rows.push(Some(name.as_str()));
            }
        }
        let config = DisplayConfig::default();
        let top = top_corridors(&corridors(&rows), &config);

        assert_eq!(top.rows.len(), 10);
        assert!(top.rows.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(top.rows[0].color.as_deref(), config.corridor_color(0));
        assert_eq!(top.rows[9].color.as_deref(), config.corridor_color(9));
    }

    #[test]
    fn test_all_null_corridors_is_empty() {
        let top = top_corridors(&corridors(&[None, None]), &DisplayConfig::default());
        assert!(top.is_empty());
        assert_eq!(top.peak(), None);
    }
}
