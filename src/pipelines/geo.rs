use serde::Serialize;

use super::utility::mean;
use crate::config::DisplayConfig;
use crate::dataset::Table;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    TapIn,
    TapOut,
}

impl MarkerKind {
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::TapIn => "Tap-In",
            MarkerKind::TapOut => "Tap-Out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    pub stop_name: Option<String>,
}

/// Map input: center point plus the markers to place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoSample {
    /// Mean tap-in position of every geo-complete row; `None` when there are none.
    pub center: Option<Coordinate>,
    /// Rows with all four coordinates present.
    pub valid_rows: usize,
    pub markers: Vec<Marker>,
}

impl GeoSample {
    pub fn is_empty(&self) -> bool {
        self.valid_rows == 0
    }
}

/// Keeps rows with all four coordinates, centers the map on their mean
/// tap-in position and turns the first `marker_rows` of them (table order, no
/// sampling) into a tap-in and a tap-out marker each.
pub fn geo_sample(table: &Table, config: &DisplayConfig) -> GeoSample {
    let valid: Vec<_> = table
        .iter()
        .filter_map(|r| r.endpoints().map(|ends| (r, ends)))
        .collect();

    let lats: Vec<f64> = valid.iter().map(|(_, (tap_in, _))| tap_in.0).collect();
    let lons: Vec<f64> = valid.iter().map(|(_, (tap_in, _))| tap_in.1).collect();
    let center = match (
        mean(&lats, "map center latitude"),
        mean(&lons, "map center longitude"),
    ) {
        (Ok(lat), Ok(lon)) => Some(Coordinate { lat, lon }),
        _ => None,
    };

    let mut markers = Vec::with_capacity(config.marker_rows.min(valid.len()) * 2);
    for (record, (tap_in, tap_out)) in valid.iter().take(config.marker_rows) {
        markers.push(Marker {
            kind: MarkerKind::TapIn,
            lat: tap_in.0,
            lon: tap_in.1,
            label: MarkerKind::TapIn.label().to_string(),
            stop_name: record.tap_in_stop_name.clone(),
        });
        markers.push(Marker {
            kind: MarkerKind::TapOut,
            lat: tap_out.0,
            lon: tap_out.1,
            label: MarkerKind::TapOut.label().to_string(),
            stop_name: record.tap_out_stop_name.clone(),
        });
    }

    GeoSample {
        center,
        valid_rows: valid.len(),
        markers,
    }
}
