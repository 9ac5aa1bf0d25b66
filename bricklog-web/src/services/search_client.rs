//! Web search client
//!
//! Fetches raw result snippets from a configurable search endpoint. The
//! endpoint contract is deliberately thin: GET with a `q` parameter, plain
//! text response, one snippet per line. Anything richer (a SearxNG
//! instance, a scraping proxy, a fixture server in tests) can sit behind
//! it. With no endpoint configured every search fails with
//! [`SearchError::NotConfigured`] and the resolver treats that as a failed
//! fallback.

use std::time::Duration;

use crate::types::{SearchError, SearchProvider};

const USER_AGENT: &str = "bricklog/0.1.0 (https://github.com/bricklog/bricklog)";

/// HTTP implementation of [`SearchProvider`]
pub struct HttpSearchClient {
    http_client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpSearchClient {
    pub fn new(endpoint: Option<String>) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let endpoint = self.endpoint.as_ref().ok_or(SearchError::NotConfigured)?;

        tracing::debug!(endpoint = %endpoint, query = %query, "Fetching search snippets");

        let response = self
            .http_client
            .get(endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Transport(format!(
                "Search endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let lines: Vec<String> = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(snippet_count = lines.len(), "Search snippets received");

        Ok(lines)
    }
}
