//! Collection API handlers
//!
//! GET/POST /api/sets, POST /api/sets/validate, DELETE /api/sets/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::models::{CollectionEntry, Resolution};
use crate::services::ResolveError;
use crate::types::{CatalogError, CatalogSet, ProvisionalSet, SetNumber, Source};
use crate::AppState;

/// Delay between upstream lookups when enriching the whole collection,
/// so a large gallery refresh doesn't trip upstream rate limits
const LIST_LOOKUP_DELAY_MS: u64 = 100;

/// Stored entry merged with whatever metadata resolution produced
///
/// This is the JSON shape the gallery consumes: database fields in
/// camelCase, catalog fields verbatim from the upstream payload.
#[derive(Debug, Serialize)]
pub struct EnrichedEntry {
    pub id: i64,
    #[serde(rename = "setNumber")]
    pub set_number: String,
    pub source: Source,
    pub confidence: i64,
    #[serde(rename = "manualOverride")]
    pub manual_override: bool,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
    pub set_num: String,
    pub name: String,
    pub year: i32,
    pub num_parts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<i64>,
    pub set_img_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_dt: Option<String>,
    #[serde(rename = "isStored")]
    pub is_stored: bool,
    #[serde(rename = "needsConfirmation", skip_serializing_if = "Option::is_none")]
    pub needs_confirmation: Option<bool>,
    #[serde(rename = "apiError", skip_serializing_if = "Option::is_none")]
    pub api_error: Option<bool>,
}

impl EnrichedEntry {
    /// Authoritative catalog record; stored provenance wins for
    /// source/confidence
    pub(crate) fn from_catalog(entry: CollectionEntry, record: CatalogSet) -> Self {
        Self {
            id: entry.id,
            set_number: entry.set_number,
            source: entry.source,
            confidence: entry.confidence,
            manual_override: entry.manual_override,
            date_added: entry.date_added,
            set_num: record.set_num,
            name: record.name,
            year: record.year,
            num_parts: record.num_parts,
            theme: None,
            theme_id: Some(record.theme_id),
            set_img_url: record.set_img_url.unwrap_or_default(),
            set_url: record.set_url,
            last_modified_dt: record.last_modified_dt,
            is_stored: true,
            needs_confirmation: None,
            api_error: None,
        }
    }

    /// Web-search derived record; the provisional confidence wins
    pub(crate) fn from_provisional(entry: CollectionEntry, provisional: ProvisionalSet) -> Self {
        Self {
            id: entry.id,
            set_number: entry.set_number,
            source: Source::WebSearch,
            confidence: provisional.confidence as i64,
            manual_override: entry.manual_override,
            date_added: entry.date_added,
            set_num: provisional.set_num,
            name: provisional.name,
            year: provisional.year,
            num_parts: provisional.num_parts,
            theme: Some(provisional.theme),
            theme_id: None,
            set_img_url: provisional.set_img_url,
            set_url: None,
            last_modified_dt: None,
            is_stored: true,
            needs_confirmation: Some(provisional.requires_confirmation),
            api_error: None,
        }
    }

    /// Final fallback when no source produced metadata: keep the stored
    /// entry visible instead of failing the whole listing
    pub(crate) fn degraded(entry: CollectionEntry) -> Self {
        let name = format!("Set {}", entry.set_number);
        Self {
            set_num: entry.set_number.clone(),
            id: entry.id,
            set_number: entry.set_number,
            source: entry.source,
            confidence: entry.confidence,
            manual_override: entry.manual_override,
            date_added: entry.date_added,
            name,
            year: 0,
            num_parts: 0,
            theme: None,
            theme_id: None,
            set_img_url: String::new(),
            set_url: None,
            last_modified_dt: None,
            is_stored: true,
            needs_confirmation: None,
            api_error: Some(true),
        }
    }
}

/// POST /api/sets and /api/sets/validate request body
#[derive(Debug, Deserialize)]
pub struct AddSetRequest {
    #[serde(rename = "setNumber")]
    pub set_number: String,
}

/// POST /api/sets/validate response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(rename = "setData", skip_serializing_if = "Option::is_none")]
    pub set_data: Option<serde_json::Value>,
    #[serde(rename = "requiresConfirmation", skip_serializing_if = "Option::is_none")]
    pub requires_confirmation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/sets
///
/// List the collection, newest first, each entry enriched through the
/// resolution pipeline. Enrichment failures degrade individual entries;
/// the listing itself never fails on upstream trouble.
pub async fn list_sets(State(state): State<AppState>) -> ApiResult<Json<Vec<EnrichedEntry>>> {
    let entries = crate::db::sets::list_entries(&state.db).await?;

    let mut results = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(LIST_LOOKUP_DELAY_MS)).await;
        }
        results.push(enrich_entry(&state, entry).await);
    }

    Ok(Json(results))
}

async fn enrich_entry(state: &AppState, entry: CollectionEntry) -> EnrichedEntry {
    let set_number = match SetNumber::parse(&entry.set_number) {
        Ok(set_number) => set_number,
        Err(e) => {
            warn!(set_number = %entry.set_number, error = %e, "Stored entry has malformed set number");
            return EnrichedEntry::degraded(entry);
        }
    };

    match state.resolver.resolve_number(&set_number).await {
        Ok(Resolution::Catalog(record)) => EnrichedEntry::from_catalog(entry, record),
        Ok(Resolution::WebSearch(provisional)) => {
            EnrichedEntry::from_provisional(entry, provisional)
        }
        Err(e) => {
            warn!(set_number = %set_number, error = %e, "Enrichment failed, serving stub record");
            *state.last_error.write().await = Some(e.to_string());
            EnrichedEntry::degraded(entry)
        }
    }
}

/// POST /api/sets
///
/// Add a set to the collection. Only authoritative catalog records are
/// persisted here; web-search results go through the confirmation flow
/// (validate + /api/sets/web-search) instead.
pub async fn add_set(
    State(state): State<AppState>,
    Json(request): Json<AddSetRequest>,
) -> ApiResult<(StatusCode, Json<EnrichedEntry>)> {
    let set_number = SetNumber::parse(&request.set_number)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if crate::db::sets::find_by_set_number(&state.db, set_number.as_str())
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Set already exists in collection".to_string(),
        ));
    }

    let record = state
        .resolver
        .catalog_lookup(&set_number)
        .await
        .map_err(|e| match e {
            CatalogError::SetNotFound(_) => ApiError::NotFound("LEGO set not found".to_string()),
            CatalogError::RateLimitExceeded => {
                ApiError::RateLimited("Catalog rate limit exceeded".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        })?;

    let entry = crate::db::sets::insert_entry(
        &state.db,
        set_number.as_str(),
        Source::Catalog,
        100,
        false,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrichedEntry::from_catalog(entry, record)),
    ))
}

/// POST /api/sets/validate
///
/// Validate and preview a set before adding. Runs the full pipeline, so a
/// catalog miss can still come back as a confirmable web-search preview.
/// Format and not-found failures are part of the 200 response body, as the
/// UI treats them as form feedback rather than errors.
pub async fn validate_set(
    State(state): State<AppState>,
    Json(request): Json<AddSetRequest>,
) -> ApiResult<Json<ValidateResponse>> {
    let set_number = match SetNumber::parse(&request.set_number) {
        Ok(set_number) => set_number,
        Err(e) => {
            return Ok(Json(ValidateResponse {
                valid: false,
                set_data: None,
                requires_confirmation: None,
                error: Some(e.to_string()),
            }))
        }
    };

    match state.resolver.resolve_number(&set_number).await {
        Ok(Resolution::Catalog(record)) => Ok(Json(ValidateResponse {
            valid: true,
            set_data: serde_json::to_value(&record).ok(),
            requires_confirmation: None,
            error: None,
        })),
        Ok(Resolution::WebSearch(provisional)) => {
            let requires_confirmation = provisional.requires_confirmation;
            Ok(Json(ValidateResponse {
                valid: true,
                set_data: serde_json::to_value(&provisional).ok(),
                requires_confirmation: Some(requires_confirmation),
                error: None,
            }))
        }
        Err(ResolveError::NotFound(_)) => Ok(Json(ValidateResponse {
            valid: false,
            set_data: None,
            requires_confirmation: None,
            error: Some("LEGO set not found".to_string()),
        })),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/sets/:id
pub async fn delete_set(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    if crate::db::sets::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Set not found: {}", id)));
    }

    crate::db::sets::delete_entry(&state.db, id).await?;

    Ok(Json(json!({ "message": "Set deleted successfully" })))
}

/// Build collection routes
pub fn sets_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sets", get(list_sets).post(add_set))
        .route("/api/sets/validate", post(validate_set))
        .route("/api/sets/:id", delete(delete_set))
}
