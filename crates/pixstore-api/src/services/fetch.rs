//! Remote image retrieval.

use std::time::Duration;

use bytes::Bytes;
use pixstore_core::AppError;

/// HTTP client for pulling image content from caller-supplied URLs.
///
/// The client enforces a request timeout but no size cap of its own; the
/// downloaded bytes go through the same validation as any other upload.
#[derive(Clone)]
pub struct RemoteFetcher {
    client: reqwest::Client,
}

impl RemoteFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client })
    }

    /// Download the full body at `url`.
    pub async fn fetch(&self, url: &str) -> Result<Bytes, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::FetchFailed("URL must not be empty".to_string()));
        }

        let parsed_url = reqwest::Url::parse(url)
            .map_err(|_| AppError::FetchFailed(format!("Invalid URL format: {}", url)))?;

        // Only allow HTTP/HTTPS
        if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
            return Err(AppError::FetchFailed(
                "Only HTTP and HTTPS URLs are allowed".to_string(),
            ));
        }

        let response = self.client.get(parsed_url).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to download from URL");
            AppError::FetchFailed(format!("Failed to download from URL: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::FetchFailed(format!(
                "URL returned status code: {}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::FetchFailed(format!("Failed to read response body: {}", e)))
    }
}
