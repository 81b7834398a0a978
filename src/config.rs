//! Display configuration: label remapping, legend order, colors and limits.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Plotly's qualitative palette, assigned to corridors by rank.
const CORRIDOR_PALETTE: &[&str] = &[
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Mappings and limits handed to the pipelines and renderers.
///
/// Stored as a JSON object on disk; every key is optional and falls back to
/// the built-in default:
/// ```json
/// {
///   "top_corridors": 10,
///   "bank_labels": { "dki": "DKI", "emoney": "e-Money" },
///   "bank_legend_order": ["DKI", "e-Money"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub top_corridors: usize,
    pub corridor_palette: Vec<String>,
    /// Rows (not markers) taken for the map; each row yields two markers.
    pub marker_rows: usize,
    pub hourly_color: String,
    pub bank_labels: BTreeMap<String, String>,
    pub bank_legend_order: Vec<String>,
    pub bank_colors: BTreeMap<String, String>,
    pub sex_colors: BTreeMap<String, String>,
    pub frame_duration_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let pairs = |items: &[(&str, &str)]| {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            top_corridors: 10,
            corridor_palette: CORRIDOR_PALETTE.iter().map(|c| c.to_string()).collect(),
            marker_rows: 100,
            hourly_color: "#636EFA".to_string(),
            bank_labels: pairs(&[
                ("dki", "DKI"),
                ("emoney", "e-Money"),
                ("bni", "BNI"),
                ("brizzi", "BRIZZI"),
                ("flazz", "Flazz"),
                ("online", "Online"),
            ]),
            bank_legend_order: ["DKI", "e-Money", "BRIZZI", "BNI", "Flazz", "Online"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            // Flazz has no fixed color; the renderer picks one.
            bank_colors: pairs(&[
                ("DKI", "#1f77b4"),
                ("e-Money", "#ff7f0e"),
                ("BNI", "#2ca02c"),
                ("BRIZZI", "#d62728"),
                ("Online", "#9467bd"),
            ]),
            sex_colors: pairs(&[
                ("M", "#1f77b4"),
                ("F", "#ff7f0e"),
                ("Male", "#1f77b4"),
                ("Female", "#ff7f0e"),
            ]),
            frame_duration_ms: 500,
        }
    }
}

impl DisplayConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Display label for a raw bank code; unmapped codes are returned as-is.
    pub fn bank_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.bank_labels.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Palette color for a corridor at `rank` (0-based).
    pub fn corridor_color(&self, rank: usize) -> Option<&str> {
        if self.corridor_palette.is_empty() {
            return None;
        }
        Some(self.corridor_palette[rank % self.corridor_palette.len()].as_str())
    }
}
