//! Single-value highlights derived from the aggregation results.
//!
//! [`Highlights`] is computed once per pass. Chart annotations and the
//! narrative text are both rendered from it, so the numbers shown in the
//! chart and in the text cannot disagree.

use serde::Serialize;

use crate::error::{ExplorerError, Result};
use crate::pipelines::{BankCounts, HourSexCounts, HourlyCounts, TopCorridors};

/// The key with the highest count in a grouped result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Peak<K> {
    pub key: K,
    pub count: usize,
}

/// Argmax over `(key, count)` pairs. On a tie the first pair wins.
///
/// # Errors
///
/// Returns [`ExplorerError::EmptyResult`] naming `what` when `items` is empty.
pub fn extract_peak<K, I>(items: I, what: &'static str) -> Result<Peak<K>>
where
    I: IntoIterator<Item = (K, usize)>,
{
    let mut best: Option<Peak<K>> = None;
    for (key, count) in items {
        if best.as_ref().is_none_or(|peak| count > peak.count) {
            best = Some(Peak { key, count });
        }
    }
    best.ok_or(ExplorerError::EmptyResult(what))
}

/// A callout placed on a chart at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation<K> {
    pub x: K,
    pub y: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotations {
    pub hourly: Option<Annotation<u32>>,
    pub corridor: Option<Annotation<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlights {
    pub peak_hour: Option<Peak<u32>>,
    pub top_corridor: Option<Peak<String>>,
    pub dominant_bank: Option<Peak<String>>,
    /// Most frequent card-holder sex within the peak hour.
    pub peak_hour_sex: Option<Peak<String>>,
}

impl Highlights {
    pub fn from_results(
        hourly: &HourlyCounts,
        corridors: &TopCorridors,
        banks: &BankCounts,
        hour_sex: &HourSexCounts,
    ) -> Self {
        let peak_hour = hourly.peak();
        let peak_hour_sex = peak_hour.as_ref().and_then(|p| hour_sex.dominant_at(p.key));

        Self {
            peak_hour,
            top_corridor: corridors.peak(),
            dominant_bank: banks.dominant(),
            peak_hour_sex,
        }
    }

    pub fn annotations(&self) -> Annotations {
        Annotations {
            hourly: self.peak_hour.as_ref().map(|p| Annotation {
                x: p.key,
                y: p.count,
                text: format!("Peak: {} transactions", p.count),
            }),
            corridor: self.top_corridor.as_ref().map(|p| Annotation {
                x: p.key.clone(),
                y: p.count,
                text: format!("Most popular: {}", p.count),
            }),
        }
    }

    /// Conclusion text for the current filter selection.
    pub fn narrative(&self) -> String {
        let Some(peak) = &self.peak_hour else {
            return "No transactions match the current filters.".to_string();
        };

        let mut out = String::from("Key findings for the current selection:\n\n");

        out.push_str(&format!(
            "1. Busiest hour: transactions peak at {:02}:00 with {} transactions",
            peak.key, peak.count
        ));
        match &self.peak_hour_sex {
            Some(sex) => out.push_str(&format!(
                ", {} of them by card holders of sex '{}'.\n",
                sex.count, sex.key
            )),
            None => out.push_str(".\n"),
        }

        if let Some(corridor) = &self.top_corridor {
            out.push_str(&format!(
                "2. Most popular corridor: {} with {} transactions.\n",
                corridor.key, corridor.count
            ));
        }

        if let Some(bank) = &self.dominant_bank {
            out.push_str(&format!(
                "3. Leading payment method: {} with {} transactions.\n",
                bank.key, bank.count
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_peak_first_wins_on_tie() {
        let peak = extract_peak(vec![(7, 3), (8, 5), (9, 5), (10, 1)], "peak hour").unwrap();
        assert_eq!(peak, Peak { key: 8, count: 5 });
    }

    #[test]
    fn test_extract_peak_empty_is_error() {
        let err = extract_peak(Vec::<(u32, usize)>::new(), "peak hour").unwrap_err();
        assert!(matches!(err, ExplorerError::EmptyResult("peak hour")));
    }

    #[test]
    fn test_annotation_and_narrative_share_peak() {
        let highlights = Highlights {
            peak_hour: Some(Peak { key: 8, count: 42 }),
            top_corridor: Some(Peak {
                key: "Cibubur - Balai Kota".into(),
                count: 17,
            }),
            dominant_bank: Some(Peak {
                key: "e-Money".into(),
                count: 30,
            }),
            peak_hour_sex: Some(Peak {
                key: "M".into(),
                count: 25,
            }),
        };

        let annotations = highlights.annotations();
        let hourly = annotations.hourly.unwrap();
        assert_eq!((hourly.x, hourly.y), (8, 42));
        assert_eq!(hourly.text, "Peak: 42 transactions");

        let text = highlights.narrative();
        assert!(text.contains("08:00 with 42 transactions"));
        assert!(text.contains("Cibubur - Balai Kota with 17"));
        assert!(text.contains("e-Money with 30"));
        assert!(text.contains("25 of them"));
    }

    #[test]
    fn test_empty_highlights() {
        let highlights = Highlights::default();
        let annotations = highlights.annotations();
        assert!(annotations.hourly.is_none());
        assert!(annotations.corridor.is_none());
        assert_eq!(
            highlights.narrative(),
            "No transactions match the current filters."
        );
    }
}
