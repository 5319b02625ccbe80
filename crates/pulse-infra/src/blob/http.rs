//! HTTP blob store: uploads with `PUT <base>/<path>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use pulse_core::SourceError;
use pulse_core::ports::BlobStore;

/// HTTP blob endpoint configuration.
#[derive(Debug, Clone)]
pub struct HttpBlobConfig {
    /// Base URL; the object URL is `<base_url>/<path>`.
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpBlobConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blob store writing objects to an HTTP endpoint that accepts `PUT`.
pub struct HttpBlobStore {
    client: Client,
    config: HttpBlobConfig,
}

impl HttpBlobStore {
    pub fn new(config: HttpBlobConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::remote(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.config.base_url, path.trim_start_matches('/'));

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Blob upload rejected");
            return Err(SourceError::remote(format!("Upload rejected with status {status}")));
        }

        Ok(url)
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> SourceError {
    if e.is_connect() || e.is_timeout() {
        SourceError::Network(e.to_string())
    } else {
        SourceError::remote(e.to_string())
    }
}
