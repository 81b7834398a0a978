//! Where the raw dataset bytes come from.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::error::{ExplorerError, Result};
use crate::fetch::{BasicClient, BearerToken, HttpClient, fetch_bytes};

/// Produces the raw (possibly gzip-compressed) CSV bytes of the dataset.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// A CSV file on the local filesystem.
pub struct LocalFile {
    pub path: PathBuf,
}

#[async_trait]
impl DatasetSource for LocalFile {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| ExplorerError::Fetch(format!("{}: {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A CSV served over HTTP(S).
pub struct RemoteFile {
    url: String,
    client: Box<dyn HttpClient>,
}

impl RemoteFile {
    pub fn new(url: String, client: Box<dyn HttpClient>) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl DatasetSource for RemoteFile {
    async fn fetch(&self) -> Result<Vec<u8>> {
        fetch_bytes(self.client.as_ref(), &self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Chooses a local or remote source from `location`. A token, if given, is
/// sent as a bearer header on remote requests and ignored for local files.
pub fn source_for(location: &str, token: Option<&str>) -> Result<Box<dyn DatasetSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let basic = BasicClient::new()?;
        let client: Box<dyn HttpClient> = match token {
            Some(token) => Box::new(BearerToken::new(basic, token)?),
            None => Box::new(basic),
        };
        info!(url = location, authenticated = token.is_some(), "Using remote dataset");
        Ok(Box::new(RemoteFile::new(location.to_string(), client)))
    } else {
        info!(path = location, "Using local dataset");
        Ok(Box::new(LocalFile {
            path: PathBuf::from(location),
        }))
    }
}
