//! HTTP retrieval of the raw dataset.

mod auth;
mod client;

pub use auth::BearerToken;
pub use client::{BasicClient, HttpClient};

use crate::error::{ExplorerError, Result};
use tracing::debug;

/// Downloads `url` and returns the body. Any non-success status is a fetch error.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| ExplorerError::Fetch(format!("invalid URL '{url}': {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ExplorerError::Fetch(format!("{url} returned status {status}")));
    }

    let bytes = resp.bytes().await?;
    debug!(url, bytes = bytes.len(), "Dataset body received");
    Ok(bytes.to_vec())
}
