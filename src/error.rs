//! Error types shared by the loader, filter engine and pipelines.

/// Problems with the shape or content of the source table.
#[derive(Debug, thiserror::Error)]
pub enum DataFormatError {
    #[error("required column '{0}' is missing from the dataset header")]
    MissingColumn(&'static str),

    #[error("row {row}: column '{column}' has malformed timestamp '{value}'")]
    Timestamp {
        row: u64,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: column '{column}' is empty")]
    EmptyField { row: u64, column: &'static str },

    #[error("malformed record: {0}")]
    Record(#[from] csv::Error),
}

/// Errors produced by the explorer library.
///
/// `Fetch` and `DataFormat` are fatal for a session. `EmptyResult` is raised
/// when a peak or mean is requested over zero rows; pipelines catch it and
/// return a neutral value instead.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("dataset fetch failed: {0}")]
    Fetch(String),

    #[error("data format error: {0}")]
    DataFormat(#[from] DataFormatError),

    #[error("no rows to compute {0}")]
    EmptyResult(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
