//! Remote endpoint client
//!
//! Fetches the read-only record collection from the configured endpoint via a
//! single unauthenticated request. Each record exposes at least a title and
//! optionally a body.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("qsync/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote client errors
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One record from the remote collection
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePost {
    /// Remote record id (unused locally, kept for logging)
    #[serde(default)]
    pub id: Option<u64>,
    /// Record title; becomes the quote text
    pub title: String,
    /// Record body; first line becomes the quote category
    #[serde(default)]
    pub body: Option<String>,
}

/// Source of remote records, injected into the sync orchestrator so the
/// sync cycle can be exercised without a network
#[async_trait::async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RemotePost>, RemoteError>;
}

/// HTTP client for the remote record collection
pub struct RemoteQuoteClient {
    http_client: reqwest::Client,
    server_url: String,
}

impl RemoteQuoteClient {
    pub fn new(server_url: String) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            server_url,
        })
    }

    /// Fetch the full remote record collection
    pub async fn fetch_posts(&self) -> Result<Vec<RemotePost>, RemoteError> {
        tracing::debug!(url = %self.server_url, "Fetching remote records");

        let response = self
            .http_client
            .get(&self.server_url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(status.as_u16(), error_text));
        }

        let posts: Vec<RemotePost> = response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        tracing::info!(count = posts.len(), "Retrieved remote records");

        Ok(posts)
    }
}

#[async_trait::async_trait]
impl QuoteFetcher for RemoteQuoteClient {
    async fn fetch(&self) -> Result<Vec<RemotePost>, RemoteError> {
        self.fetch_posts().await
    }
}
