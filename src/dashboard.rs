//! One recomputation pass: filter, the five pipelines, then highlights.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::DisplayConfig;
use crate::dataset::{Table, day_name};
use crate::filter::{ALL_CORRIDORS, CorridorSelector, FilterCriteria, apply_filters};
use crate::pipelines::{
    BankCounts, GeoSample, HourSexCounts, HourlyCounts, TopCorridors, bank_counts, geo_sample,
    hour_sex_counts, hourly_counts, top_corridors,
};
use crate::summary::{Annotations, Highlights};

/// The filter selection as shown back to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilters {
    pub day: Option<String>,
    pub corridor: String,
    pub banks: Vec<String>,
}

impl From<&FilterCriteria> for AppliedFilters {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            day: criteria.day.map(|d| day_name(d).to_string()),
            corridor: match &criteria.corridor {
                CorridorSelector::All => ALL_CORRIDORS.to_string(),
                CorridorSelector::Named(name) => name.clone(),
            },
            banks: criteria.banks.iter().cloned().collect(),
        }
    }
}

/// Everything the chart and map renderers need for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub filters: AppliedFilters,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub hourly: HourlyCounts,
    pub corridors: TopCorridors,
    pub geo: GeoSample,
    pub banks: BankCounts,
    pub hour_sex: HourSexCounts,
    pub highlights: Highlights,
    pub annotations: Annotations,
    pub narrative: String,
}

impl DashboardReport {
    /// Runs a full pass over `table`. Nothing here fails: an empty selection
    /// yields empty datasets and no highlights.
    #[tracing::instrument(skip_all, fields(total_rows = table.len()))]
    pub fn build(table: &Table, criteria: &FilterCriteria, config: &DisplayConfig) -> Self {
        let filtered = apply_filters(table, criteria);

        let hourly = hourly_counts(&filtered, config);
        let corridors = top_corridors(&filtered, config);
        let geo = geo_sample(&filtered, config);
        let banks = bank_counts(&filtered, config);
        let hour_sex = hour_sex_counts(&filtered, config);

        let highlights = Highlights::from_results(&hourly, &corridors, &banks, &hour_sex);
        let annotations = highlights.annotations();
        let narrative = highlights.narrative();

        info!(
            filtered_rows = filtered.len(),
            peak_hour = highlights.peak_hour.as_ref().map(|p| p.key),
            top_corridor = highlights.top_corridor.as_ref().map(|p| p.key.as_str()),
            "Dashboard pass complete"
        );

        Self {
            generated_at: Utc::now(),
            filters: AppliedFilters::from(criteria),
            total_rows: table.len(),
            filtered_rows: filtered.len(),
            hourly,
            corridors,
            geo,
            banks,
            hour_sex,
            highlights,
            annotations,
            narrative,
        }
    }
}
