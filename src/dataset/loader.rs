//! CSV parsing for the raw transaction export.

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::{debug, info};

use super::record::{REQUIRED_COLUMNS, RawRow, TransactionRecord};
use super::table::Table;
use crate::error::{DataFormatError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parses raw dataset bytes (plain or gzip-compressed CSV) into a [`Table`].
///
/// # Errors
///
/// Returns [`DataFormatError::MissingColumn`] when a required header is absent,
/// [`DataFormatError::Timestamp`] for an unparseable tap-in/tap-out time, and
/// [`DataFormatError::Record`] for rows that do not fit the schema.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn parse_table(bytes: &[u8]) -> Result<Table> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut decoded)?;
        debug!(decoded = decoded.len(), "Decompressed gzip dataset");
        return parse_csv(&decoded);
    }
    parse_csv(bytes)
}

fn parse_csv(bytes: &[u8]) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers().map_err(DataFormatError::from)?.clone();
    for &column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataFormatError::MissingColumn(column).into());
        }
    }

    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize::<RawRow>().enumerate() {
        let raw = result.map_err(DataFormatError::from)?;
        rows.push(TransactionRecord::from_raw(raw, index as u64 + 1)?);
    }

    info!(rows = rows.len(), "Dataset parsed");
    Ok(Table::new(rows))
}
