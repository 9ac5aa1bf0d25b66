//! Web-search confirmation endpoint
//!
//! The accept path of the confirmation gate: the UI shows the provisional
//! record to the user, and only an explicit accept lands here. Rejection is
//! simply never posting the record.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::api::sets::EnrichedEntry;
use crate::error::{ApiError, ApiResult};
use crate::types::{ProvisionalSet, SetNumber, Source};
use crate::AppState;

/// POST /api/sets/web-search request body
///
/// The full provisional record as previously previewed; it is re-validated
/// here because nothing stops a client from editing it in flight.
#[derive(Debug, Deserialize)]
pub struct ConfirmWebSearchRequest {
    #[serde(rename = "setNumber")]
    pub set_number: String,
    pub name: String,
    pub year: i32,
    pub num_parts: i64,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub set_img_url: Option<String>,
    pub confidence: i64,
}

/// POST /api/sets/web-search
///
/// Persist a user-confirmed web search result.
pub async fn confirm_web_search(
    State(state): State<AppState>,
    Json(request): Json<ConfirmWebSearchRequest>,
) -> ApiResult<(StatusCode, Json<EnrichedEntry>)> {
    let set_number = SetNumber::parse(&request.set_number)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let current_year = Utc::now().year();
    if request.year < 1958 || request.year > current_year + 2 {
        return Err(ApiError::BadRequest(format!(
            "Year must be between 1958 and {}",
            current_year + 2
        )));
    }

    if request.num_parts < 0 || request.num_parts > 20000 {
        return Err(ApiError::BadRequest(
            "Number of parts must be between 0 and 20000".to_string(),
        ));
    }

    if !(0..=100).contains(&request.confidence) {
        return Err(ApiError::BadRequest(
            "Confidence must be between 0 and 100".to_string(),
        ));
    }

    if crate::db::sets::find_by_set_number(&state.db, set_number.as_str())
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Set already exists in collection".to_string(),
        ));
    }

    let entry = crate::db::sets::insert_entry(
        &state.db,
        set_number.as_str(),
        Source::WebSearch,
        request.confidence,
        false,
    )
    .await?;

    // Confirmed records need no further confirmation
    let provisional = ProvisionalSet {
        set_num: set_number.catalog_num(),
        name: request.name,
        year: request.year,
        num_parts: request.num_parts,
        theme: request.theme.unwrap_or_default(),
        set_img_url: request.set_img_url.unwrap_or_default(),
        confidence: request.confidence as u8,
        source: Source::WebSearch,
        requires_confirmation: false,
    };

    Ok((
        StatusCode::CREATED,
        Json(EnrichedEntry::from_provisional(entry, provisional)),
    ))
}

/// Build web-search confirmation routes
pub fn web_search_routes() -> Router<AppState> {
    Router::new().route("/api/sets/web-search", post(confirm_web_search))
}
