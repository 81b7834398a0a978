use std::collections::HashMap;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::dataset::Table;
use crate::summary::{Peak, extract_peak};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankCount {
    pub label: String,
    pub count: usize,
    pub color: Option<String>,
}

/// Transactions per payment bank, relabelled for display and in legend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BankCounts {
    pub rows: Vec<BankCount>,
}

impl BankCounts {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count_for(&self, label: &str) -> Option<usize> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.count)
    }

    /// Label with the most transactions; legend order breaks ties.
    pub fn dominant(&self) -> Option<Peak<String>> {
        extract_peak(
            self.rows.iter().map(|r| (r.label.clone(), r.count)),
            "dominant bank",
        )
        .ok()
    }
}

/// Counts rows per raw `payCardBank` code, maps each code to its display
/// label (codes without a mapping keep their raw value, codes sharing a
/// label are summed), then orders the labels by `bank_legend_order`.
/// Labels outside the legend follow, largest first.
pub fn bank_counts(table: &Table, config: &DisplayConfig) -> BankCounts {
    let mut labels: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for code in table.iter().filter_map(|r| r.pay_card_bank.as_deref()) {
        let label = config.bank_label(code);
        match index.get(label) {
            Some(&i) => labels[i].1 += 1,
            None => {
                index.insert(label, labels.len());
                labels.push((label, 1));
            }
        }
    }
    labels.sort_by(|a, b| b.1.cmp(&a.1));

    let legend_rank = |label: &str| {
        config
            .bank_legend_order
            .iter()
            .position(|l| l == label)
            .unwrap_or(usize::MAX)
    };
    labels.sort_by_key(|(label, _)| legend_rank(label));

    BankCounts {
        rows: labels
            .into_iter()
            .map(|(label, count)| BankCount {
                label: label.to_string(),
                count,
                color: config.bank_colors.get(label).cloned(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{TransactionRecord, parse_timestamp};

    fn banks(codes: &[Option<&str>]) -> Table {
        let ts = parse_timestamp("2023-04-03 07:00:00").unwrap();
        codes
            .iter()
            .map(|c| {
                let mut r = TransactionRecord::new(ts);
                r.pay_card_bank = c.map(str::to_string);
                r
            })
            .collect()
    }

    #[test]
    fn test_labels_remapped_and_in_legend_order() {
        let table = banks(&[
            Some("emoney"),
            Some("emoney"),
            Some("flazz"),
            Some("dki"),
            Some("emoney"),
            None,
        ]);
        let counts = bank_counts(&table, &DisplayConfig::default());

        let labels: Vec<&str> = counts.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["DKI", "e-Money", "Flazz"]);
        assert_eq!(counts.count_for("e-Money"), Some(3));
        assert_eq!(counts.rows[0].color.as_deref(), Some("#1f77b4"));
        assert_eq!(counts.rows[2].color, None);
    }

    #[test]
    fn test_unmapped_code_kept_and_placed_after_legend() {
        let table = banks(&[Some("mandiri"), Some("mandiri"), Some("bni")]);
        let counts = bank_counts(&table, &DisplayConfig::default());
        let labels: Vec<&str> = counts.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["BNI", "mandiri"]);
        assert_eq!(counts.dominant(), Some(Peak { key: "mandiri".into(), count: 2 }));
    }

    #[test]
    fn test_codes_sharing_a_label_are_summed() {
        let mut config = DisplayConfig::default();
        config.bank_labels.insert("bri".into(), "BRIZZI".into());
        let table = banks(&[Some("brizzi"), Some("bri")]);
        let counts = bank_counts(&table, &config);
        assert_eq!(counts.rows.len(), 1);
        assert_eq!(counts.count_for("BRIZZI"), Some(2));
    }

    #[test]
    fn test_empty() {
        let counts = bank_counts(&banks(&[None]), &DisplayConfig::default());
        assert!(counts.is_empty());
        assert_eq!(counts.dominant(), None);
    }
}
