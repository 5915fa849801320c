//! Remote sources for the structured format
//!
//! [`RemoteSource`] is the seam between the ingestion gateway and the
//! transport. [`HttpSource`] performs a single plain GET with reqwest: no
//! retries, no custom headers, no authentication.

use crate::error::ImportError;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

/// Something that can return the raw body behind a URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the full body. An empty body is returned as-is; the gateway
    /// decides what emptiness means.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImportError>;
}

/// Validate a user-supplied URL string
///
/// The string must parse as an absolute URL with an `http` or `https`
/// scheme and a host.
pub fn parse_url(input: &str) -> Result<Url, ImportError> {
    let trimmed = input.trim();
    let invalid = |reason: String| ImportError::InvalidUrl {
        url: trimmed.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// HTTP GET backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Client with transport defaults
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client with an explicit request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ImportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Network(format!("HTTP {} from {}", status, url)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ImportError::Network(e.to_string()))?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
