//! Handing dashboard results to renderers: JSON reports and CSV tables.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::dashboard::DashboardReport;
use crate::error::Result;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DashboardReport) {
    debug!("{:#?}", report);
}

/// Serializes any report-like value as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    fs::write(path, to_json(value)?)?;
    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes `rows` as a CSV table to `path`, replacing any existing file.
///
/// The header comes from the first row, so an empty slice produces an empty file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV table written");
    Ok(())
}

/// Writes each chart dataset of `report` as its own CSV file in `dir` and
/// returns the paths written.
pub fn export_tables(dir: &Path, report: &DashboardReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let paths = vec![
        dir.join("hourly.csv"),
        dir.join("corridors.csv"),
        dir.join("markers.csv"),
        dir.join("banks.csv"),
        dir.join("hour_sex.csv"),
    ];

    write_csv(&paths[0], &report.hourly.rows)?;
    write_csv(&paths[1], &report.corridors.rows)?;
    write_csv(&paths[2], &report.geo.markers)?;
    write_csv(&paths[3], &report.banks.rows)?;
    write_csv(&paths[4], &report.hour_sex.rows)?;

    info!(dir = %dir.display(), files = paths.len(), "Chart tables exported");
    Ok(paths)
}
