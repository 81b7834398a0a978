//! The five chart datasets computed from a filtered table.
//!
//! Each pipeline is a pure function of the filtered [`Table`](crate::dataset::Table)
//! and never fails: an empty input produces an empty result whose peak,
//! center or axis maximum is `None`.

pub mod banks;
pub mod corridors;
pub mod gender;
pub mod geo;
pub mod hourly;
mod utility;

pub use banks::{BankCount, BankCounts, bank_counts};
pub use corridors::{CorridorCount, TopCorridors, top_corridors};
pub use gender::{HourFrame, HourSexCount, HourSexCounts, SexBar, hour_sex_counts};
pub use geo::{Coordinate, GeoSample, Marker, MarkerKind, geo_sample};
pub use hourly::{HourCount, HourlyCounts, hourly_counts};
