//! Rebrickable API client
//!
//! Authoritative catalog lookups against the Rebrickable v3 API, with
//! client-side rate limiting. The free tier tolerates roughly one request
//! per second; bursts come back as 429.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::types::{CatalogError, CatalogProvider, CatalogSet, SetNumber};

const REBRICKABLE_BASE_URL: &str = "https://rebrickable.com/api/v3";
const USER_AGENT: &str = "bricklog/0.1.0 (https://github.com/bricklog/bricklog)";
const RATE_LIMIT_MS: u64 = 1000; // 1 request per second

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Rebrickable API client
pub struct RebrickableClient {
    http_client: reqwest::Client,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl RebrickableClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    /// Lookup a set by its catalog number
    pub async fn lookup_set(&self, set_number: &SetNumber) -> Result<CatalogSet, CatalogError> {
        // Rate limit
        self.rate_limiter.wait().await;

        let catalog_num = set_number.catalog_num();
        let url = format!("{}/lego/sets/{}/", REBRICKABLE_BASE_URL, catalog_num);

        tracing::debug!(set_number = %set_number, url = %url, "Querying Rebrickable API");

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("key {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(CatalogError::SetNotFound(set_number.to_string()));
        }

        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        let set: CatalogSet = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::info!(
            set_num = %set.set_num,
            name = %set.name,
            year = set.year,
            "Retrieved set from Rebrickable"
        );

        Ok(set)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for RebrickableClient {
    async fn set_by_number(&self, set_number: &SetNumber) -> Result<CatalogSet, CatalogError> {
        self.lookup_set(set_number).await
    }
}
