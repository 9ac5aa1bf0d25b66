//! Persisted collection entry

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Source;

/// A set the user owns, as stored in the `sets` table
///
/// Metadata (name, year, pieces, image) is not persisted; it is re-resolved
/// from the catalog or the web-search cache whenever the collection is
/// listed. Only the identifier and its provenance live here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionEntry {
    pub id: i64,
    #[serde(rename = "setNumber")]
    pub set_number: String,
    pub source: Source,
    pub confidence: i64,
    #[serde(rename = "manualOverride")]
    pub manual_override: bool,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
}
