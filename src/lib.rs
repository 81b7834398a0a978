pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod pipelines;
pub mod summary;

pub use error::{DataFormatError, ExplorerError, Result};
