//! Set resolution pipeline
//!
//! Resolves a set number to metadata: authoritative catalog lookup first,
//! web-search extraction as the fallback. One attempt per source per call,
//! no retries. Fallback failures are absorbed and logged; the caller only
//! ever sees a typed result.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::extractors::extract_fields;
use crate::models::Resolution;
use crate::types::{
    CatalogError, CatalogProvider, CatalogSet, InvalidSetNumber, ProvisionalSet, SearchError,
    SearchProvider, SetNumber,
};
use crate::validators::ConfidenceScorer;

/// Minimum confidence for a web-search result to count as resolved
const ACCEPT_CONFIDENCE: u8 = 60;

/// Resolution errors surfaced to callers
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Identifier failed the format check; rejected before any I/O
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidSetNumber),

    /// Neither the catalog nor the fallback produced a usable record
    #[error("Set not found: {0}")]
    NotFound(String),

    /// Catalog signaled 429 and the fallback could not compensate
    #[error("Catalog rate limit exceeded")]
    RateLimited,
}

/// Pipeline phase, traced as a resolution progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    CatalogLookup,
    WebSearchFallback,
    Resolved,
    Failed,
}

/// Resolution pipeline with a process-lifetime result cache
///
/// The cache maps set numbers to accepted web-search results. It is
/// unbounded and never invalidated: catalog data changes rarely and the
/// working set is a personal collection, so entries stay valid for the
/// life of the process. Writes are idempotent (same input text, same
/// result).
pub struct SetResolver {
    catalog: Arc<dyn CatalogProvider>,
    search: Arc<dyn SearchProvider>,
    scorer: ConfidenceScorer,
    cache: RwLock<HashMap<SetNumber, ProvisionalSet>>,
}

impl SetResolver {
    pub fn new(catalog: Arc<dyn CatalogProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            catalog,
            search,
            scorer: ConfidenceScorer::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a raw identifier string
    ///
    /// Validates the identifier format first; nothing leaves the process
    /// for a malformed set number.
    pub async fn resolve(&self, raw: &str) -> Result<Resolution, ResolveError> {
        let set_number = SetNumber::parse(raw)?;
        self.resolve_number(&set_number).await
    }

    /// Resolve an already-validated set number
    pub async fn resolve_number(&self, set_number: &SetNumber) -> Result<Resolution, ResolveError> {
        debug!(set_number = %set_number, phase = ?Phase::CatalogLookup, "Resolving set");

        let catalog_error = match self.catalog.set_by_number(set_number).await {
            Ok(record) => {
                debug!(set_number = %set_number, phase = ?Phase::Resolved, "Catalog hit");
                return Ok(Resolution::Catalog(record));
            }
            Err(e) => {
                info!(
                    set_number = %set_number,
                    error = %e,
                    phase = ?Phase::WebSearchFallback,
                    "Catalog lookup failed, trying web search"
                );
                e
            }
        };

        match self.web_search_fallback(set_number).await {
            Ok(Some(provisional)) => {
                debug!(
                    set_number = %set_number,
                    confidence = provisional.confidence,
                    phase = ?Phase::Resolved,
                    "Web search fallback accepted"
                );
                Ok(Resolution::WebSearch(provisional))
            }
            Ok(None) => {
                debug!(set_number = %set_number, phase = ?Phase::Failed, "No usable result");
                Err(Self::terminal_error(catalog_error, set_number))
            }
            Err(e) => {
                // Fallback errors are absorbed, never propagated as a crash
                warn!(
                    set_number = %set_number,
                    error = %e,
                    phase = ?Phase::Failed,
                    "Web search fallback failed"
                );
                Err(Self::terminal_error(catalog_error, set_number))
            }
        }
    }

    /// Direct catalog lookup, bypassing the fallback chain
    ///
    /// Used where only an authoritative record will do (adding a set
    /// without confirmation).
    pub async fn catalog_lookup(&self, set_number: &SetNumber) -> Result<CatalogSet, CatalogError> {
        self.catalog.set_by_number(set_number).await
    }

    /// Web-search fallback with get-or-compute caching
    ///
    /// Returns `Ok(None)` when the computed confidence is below the
    /// acceptance threshold; only accepted results are cached.
    async fn web_search_fallback(
        &self,
        set_number: &SetNumber,
    ) -> Result<Option<ProvisionalSet>, SearchError> {
        if let Some(hit) = self.cache.read().await.get(set_number) {
            debug!(set_number = %set_number, "Web search cache hit");
            return Ok(Some(hit.clone()));
        }

        let query = format!("LEGO {} pieces year official set", set_number);
        let lines = self.search.search(&query).await?;
        let text = lines.join(" ");

        let fields = extract_fields(&text, set_number, Utc::now().year());
        let provisional = self.scorer.finalize(fields, set_number);

        if provisional.confidence >= ACCEPT_CONFIDENCE {
            self.cache
                .write()
                .await
                .insert(set_number.clone(), provisional.clone());
            Ok(Some(provisional))
        } else {
            debug!(
                set_number = %set_number,
                confidence = provisional.confidence,
                "Confidence below acceptance threshold"
            );
            Ok(None)
        }
    }

    fn terminal_error(catalog_error: CatalogError, set_number: &SetNumber) -> ResolveError {
        match catalog_error {
            CatalogError::RateLimitExceeded => ResolveError::RateLimited,
            _ => ResolveError::NotFound(set_number.to_string()),
        }
    }
}
