//! Row types for the transaction table.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Weekday};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::DataFormatError;

/// Header names the loader refuses to run without.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "tapInTime",
    "tapOutTime",
    "corridorName",
    "payCardBank",
    "payCardSex",
    "tapInStopsLat",
    "tapInStopsLon",
    "tapOutStopsLat",
    "tapOutStopsLon",
];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One CSV row as it appears on disk. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRow {
    #[serde(rename = "transID")]
    trans_id: Option<String>,
    #[serde(rename = "corridorID")]
    corridor_id: Option<String>,
    #[serde(rename = "corridorName")]
    corridor_name: Option<String>,
    #[serde(rename = "payCardBank")]
    pay_card_bank: Option<String>,
    #[serde(rename = "payCardSex")]
    pay_card_sex: Option<String>,
    #[serde(rename = "tapInStopsName")]
    tap_in_stop_name: Option<String>,
    #[serde(rename = "tapInStopsLat", default, deserialize_with = "coordinate")]
    tap_in_lat: Option<f64>,
    #[serde(rename = "tapInStopsLon", default, deserialize_with = "coordinate")]
    tap_in_lon: Option<f64>,
    #[serde(rename = "tapInTime")]
    tap_in_time: Option<String>,
    #[serde(rename = "tapOutStopsName")]
    tap_out_stop_name: Option<String>,
    #[serde(rename = "tapOutStopsLat", default, deserialize_with = "coordinate")]
    tap_out_lat: Option<f64>,
    #[serde(rename = "tapOutStopsLon", default, deserialize_with = "coordinate")]
    tap_out_lon: Option<f64>,
    #[serde(rename = "tapOutTime")]
    tap_out_time: Option<String>,
}

/// Cell values that mean "no value" in the exported CSVs.
const MISSING_MARKERS: &[&str] = &["nan", "na", "n/a", "null", "none"];

/// Reads a coordinate cell. Empty cells, missing-value markers and
/// non-finite numbers become `None`.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(cell) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let cell = cell.trim();
    if cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|_| de::Error::custom(format!("invalid coordinate '{cell}'")))?;
    Ok(value.is_finite().then_some(value))
}

/// A parsed transaction with its derived hour-of-day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub trans_id: Option<String>,
    pub tap_in_time: NaiveDateTime,
    pub tap_out_time: Option<NaiveDateTime>,
    pub corridor_id: Option<String>,
    pub corridor_name: Option<String>,
    pub pay_card_bank: Option<String>,
    pub pay_card_sex: Option<String>,
    pub tap_in_stop_name: Option<String>,
    pub tap_out_stop_name: Option<String>,
    pub tap_in_lat: Option<f64>,
    pub tap_in_lon: Option<f64>,
    pub tap_out_lat: Option<f64>,
    pub tap_out_lon: Option<f64>,
    hour: u32,
}

impl TransactionRecord {
    /// Builds a record from a tap-in time; every optional field starts empty.
    pub fn new(tap_in_time: NaiveDateTime) -> Self {
        Self {
            trans_id: None,
            tap_in_time,
            tap_out_time: None,
            corridor_id: None,
            corridor_name: None,
            pay_card_bank: None,
            pay_card_sex: None,
            tap_in_stop_name: None,
            tap_out_stop_name: None,
            tap_in_lat: None,
            tap_in_lon: None,
            tap_out_lat: None,
            tap_out_lon: None,
            hour: tap_in_time.hour(),
        }
    }

    /// Hour of day (0-23) of the tap-in, fixed at load time.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn weekday(&self) -> Weekday {
        self.tap_in_time.weekday()
    }

    /// Both endpoints as `(lat, lon)` pairs, only when all four coordinates
    /// are present and finite.
    pub fn endpoints(&self) -> Option<((f64, f64), (f64, f64))> {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        Some((
            (finite(self.tap_in_lat)?, finite(self.tap_in_lon)?),
            (finite(self.tap_out_lat)?, finite(self.tap_out_lon)?),
        ))
    }

    pub fn with_corridor(mut self, name: &str) -> Self {
        self.corridor_name = Some(name.to_string());
        self
    }

    pub fn with_bank(mut self, code: &str) -> Self {
        self.pay_card_bank = Some(code.to_string());
        self
    }

    pub fn with_sex(mut self, sex: &str) -> Self {
        self.pay_card_sex = Some(sex.to_string());
        self
    }

    pub fn with_coordinates(mut self, tap_in: (f64, f64), tap_out: (f64, f64)) -> Self {
        self.tap_in_lat = Some(tap_in.0);
        self.tap_in_lon = Some(tap_in.1);
        self.tap_out_lat = Some(tap_out.0);
        self.tap_out_lon = Some(tap_out.1);
        self
    }

    /// Converts a raw CSV row; `row` is the 1-based data line used in errors.
    pub(crate) fn from_raw(raw: RawRow, row: u64) -> Result<Self, DataFormatError> {
        let tap_in_raw = raw.tap_in_time.ok_or(DataFormatError::EmptyField {
            row,
            column: "tapInTime",
        })?;
        let tap_in_time = parse_timestamp(&tap_in_raw).ok_or_else(|| DataFormatError::Timestamp {
            row,
            column: "tapInTime",
            value: tap_in_raw.clone(),
        })?;

        let tap_out_time = match raw.tap_out_time {
            None => None,
            Some(value) => Some(parse_timestamp(&value).ok_or(DataFormatError::Timestamp {
                row,
                column: "tapOutTime",
                value,
            })?),
        };

        Ok(Self {
            trans_id: raw.trans_id,
            tap_out_time,
            corridor_id: raw.corridor_id,
            corridor_name: raw.corridor_name,
            pay_card_bank: raw.pay_card_bank,
            pay_card_sex: raw.pay_card_sex,
            tap_in_stop_name: raw.tap_in_stop_name,
            tap_out_stop_name: raw.tap_out_stop_name,
            tap_in_lat: raw.tap_in_lat,
            tap_in_lon: raw.tap_in_lon,
            tap_out_lat: raw.tap_out_lat,
            tap_out_lon: raw.tap_out_lon,
            ..Self::new(tap_in_time)
        })
    }
}

/// Parses the timestamp layouts seen in exports of the dataset. Offsets in
/// RFC 3339 values are dropped; the wall-clock time is what the hour uses.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// English weekday name, used for both the option list and day matching.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
