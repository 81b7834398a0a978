//! Loading the raw transaction table.
//!
//! [`DatasetSource`] yields raw bytes (local file or HTTP), [`parse_table`]
//! turns them into a [`Table`], and [`DatasetCache`] memoizes the result for
//! the lifetime of the process.

mod cache;
mod loader;
mod record;
mod source;
mod table;

pub use cache::DatasetCache;
pub use loader::parse_table;
pub use record::{REQUIRED_COLUMNS, TransactionRecord, day_name, parse_timestamp};
pub use source::{DatasetSource, LocalFile, RemoteFile, source_for};
pub use table::Table;
