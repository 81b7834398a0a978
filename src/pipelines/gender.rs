use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::dataset::Table;
use crate::summary::{Peak, extract_peak};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourSexCount {
    pub hour: u32,
    pub sex: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SexBar {
    pub sex: String,
    pub count: usize,
    pub color: Option<String>,
}

/// One animation frame: the per-sex bars for a single hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourFrame {
    pub hour: u32,
    pub bars: Vec<SexBar>,
}

/// Transactions per `(hour, sex)` plus the frames of the hourly animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourSexCounts {
    /// Ascending by hour, then by sex.
    pub rows: Vec<HourSexCount>,
    /// Always 24 frames, hour 0 through 23.
    pub frames: Vec<HourFrame>,
    pub frame_duration_ms: u64,
    /// Fixed y-axis ceiling shared by every frame.
    pub y_max: Option<usize>,
}

impl HourSexCounts {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most frequent sex at `hour`; ties go to the first in sort order.
    pub fn dominant_at(&self, hour: u32) -> Option<Peak<String>> {
        extract_peak(
            self.rows
                .iter()
                .filter(|r| r.hour == hour)
                .map(|r| (r.sex.clone(), r.count)),
            "dominant sex",
        )
        .ok()
    }
}

/// Groups rows by tap-in hour and card-holder sex. Rows without a sex are
/// ignored.
pub fn hour_sex_counts(table: &Table, config: &DisplayConfig) -> HourSexCounts {
    let mut counts: BTreeMap<(u32, &str), usize> = BTreeMap::new();
    for record in table.iter() {
        if let Some(sex) = record.pay_card_sex.as_deref() {
            *counts.entry((record.hour(), sex)).or_default() += 1;
        }
    }

    let rows: Vec<HourSexCount> = counts
        .into_iter()
        .map(|((hour, sex), count)| HourSexCount {
            hour,
            sex: sex.to_string(),
            count,
        })
        .collect();

    let frames = (0..24)
        .map(|hour| HourFrame {
            hour,
            bars: rows
                .iter()
                .filter(|r| r.hour == hour)
                .map(|r| SexBar {
                    sex: r.sex.clone(),
                    count: r.count,
                    color: config.sex_colors.get(&r.sex).cloned(),
                })
                .collect(),
        })
        .collect();

    HourSexCounts {
        y_max: rows.iter().map(|r| r.count).max(),
        rows,
        frames,
        frame_duration_ms: config.frame_duration_ms,
    }
}
