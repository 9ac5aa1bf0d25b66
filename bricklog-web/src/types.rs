//! Core types and collaborator traits for bricklog-web
//!
//! Defines the set identifier newtype, the catalog and web-search record
//! types, and the provider traits the resolution pipeline depends on.
//! Production implementations live in `services/`; tests substitute
//! in-memory fakes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Set identifier
// ============================================================================

/// Accepted set number shape: 4-6 digits with an optional variant suffix
static SET_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4,6}(-\d+)?$").unwrap());

/// Rejected set number input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid set number: {0} (expected e.g. 21034 or 75192-1)")]
pub struct InvalidSetNumber(pub String);

/// Normalized LEGO set number, e.g. `21034` or `75192-1`
///
/// Parsing trims the input and enforces the identifier contract before any
/// lookup is attempted. The inner string is guaranteed to match
/// `^\d{4,6}(-\d+)?$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetNumber(String);

impl SetNumber {
    /// Validate and normalize a raw set number string
    pub fn parse(raw: &str) -> Result<Self, InvalidSetNumber> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !SET_NUMBER_RE.is_match(trimmed) {
            return Err(InvalidSetNumber(raw.trim().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog-style identifier: Rebrickable stores sets as `<number>-<variant>`,
    /// defaulting the variant to 1 when the user typed a bare number.
    pub fn catalog_num(&self) -> String {
        if self.0.contains('-') {
            self.0.clone()
        } else {
            format!("{}-1", self.0)
        }
    }
}

impl fmt::Display for SetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// Authoritative catalog metadata as returned by the Rebrickable API
///
/// Immutable once fetched; field names follow the upstream JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSet {
    pub set_num: String,
    pub name: String,
    pub year: i32,
    pub theme_id: i64,
    pub num_parts: i64,
    #[serde(default)]
    pub set_img_url: Option<String>,
    #[serde(default)]
    pub set_url: Option<String>,
    #[serde(default)]
    pub last_modified_dt: Option<String>,
}

/// Storage source tag for a collection entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Catalog,
    WebSearch,
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Catalog => "catalog",
            Source::WebSearch => "web_search",
            Source::Manual => "manual",
        }
    }
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(Source::Catalog),
            "web_search" => Ok(Source::WebSearch),
            "manual" => Ok(Source::Manual),
            other => anyhow::bail!("Unknown source tag: {}", other),
        }
    }
}

/// Provisional record built from web-search text
///
/// Lower-trust sibling of [`CatalogSet`]: carries a heuristic confidence
/// score and a confirmation flag. Lives in the resolver cache until the
/// caller confirms (persists) or rejects (discards) it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionalSet {
    pub set_num: String,
    pub name: String,
    pub year: i32,
    pub num_parts: i64,
    pub theme: String,
    pub set_img_url: String,
    /// Heuristic confidence score, 0-100
    pub confidence: u8,
    pub source: Source,
    #[serde(rename = "requiresConfirmation")]
    pub requires_confirmation: bool,
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// Catalog provider errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Set not found: {0}")]
    SetNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Search provider errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search endpoint not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Authoritative catalog lookup collaborator
///
/// Production implementation: `services::RebrickableClient`.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the canonical record for a set number
    async fn set_by_number(&self, set_number: &SetNumber) -> Result<CatalogSet, CatalogError>;
}

/// Web search collaborator feeding the fallback extractor
///
/// Returns raw result snippets, one line per hit. Production
/// implementation: `services::HttpSearchClient`.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_suffixed_numbers() {
        assert_eq!(SetNumber::parse("21034").unwrap().as_str(), "21034");
        assert_eq!(SetNumber::parse("75192-1").unwrap().as_str(), "75192-1");
        assert_eq!(SetNumber::parse("  42107 ").unwrap().as_str(), "42107");
    }

    #[test]
    fn rejects_malformed_numbers() {
        for raw in ["", "123", "1234567", "abcd", "21034-", "21034-x", "21-034"] {
            assert!(SetNumber::parse(raw).is_err(), "should reject {:?}", raw);
        }
    }

    #[test]
    fn catalog_num_appends_default_variant() {
        assert_eq!(SetNumber::parse("21034").unwrap().catalog_num(), "21034-1");
        assert_eq!(SetNumber::parse("75192-2").unwrap().catalog_num(), "75192-2");
    }

    #[test]
    fn source_round_trips_through_str() {
        for source in [Source::Catalog, Source::WebSearch, Source::Manual] {
            assert_eq!(source.as_str().parse::<Source>().unwrap(), source);
        }
        assert!("rebrickable".parse::<Source>().is_err());
    }
}
