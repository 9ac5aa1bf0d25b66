//! HTTP server & routing integration tests
//!
//! Drives the axum router directly with in-memory SQLite and fake
//! providers; no network, no listener.

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use bricklog_web::types::Source;
use bricklog_web::{build_router, AppState};
use helpers::{
    catalog_set, ducati_snippets, generic_snippets, resolver_with, CatalogMode, FakeCatalog,
    FakeSearch, SearchMode,
};

/// App state with in-memory database and the given fakes
async fn test_state(catalog: Arc<FakeCatalog>, search: Arc<FakeSearch>) -> AppState {
    let db_pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
    bricklog_web::db::init_tables(&db_pool).await.unwrap();
    AppState::new(db_pool, resolver_with(catalog, search))
}

/// App state whose catalog always finds the London Skyline set
async fn catalog_hit_state() -> AppState {
    let catalog = FakeCatalog::new(CatalogMode::Found(catalog_set(
        "21034-1",
        "London Skyline",
        2017,
        468,
    )));
    let search = FakeSearch::new(SearchMode::Fail);
    test_state(catalog, search).await
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_module_uptime_and_collection_size() {
    let state = catalog_hit_state().await;
    let app = build_router(state.clone());

    bricklog_web::db::sets::insert_entry(&state.db, "21034", Source::Catalog, 100, false)
        .await
        .unwrap();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bricklog-web");
    assert_eq!(body["set_count"], 1);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn add_set_persists_catalog_record() {
    let state = catalog_hit_state().await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets",
            json!({ "setNumber": "21034" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["setNumber"], "21034");
    assert_eq!(body["set_num"], "21034-1");
    assert_eq!(body["name"], "London Skyline");
    assert_eq!(body["source"], "catalog");
    assert_eq!(body["confidence"], 100);
    assert_eq!(body["isStored"], true);

    let stored = bricklog_web::db::sets::find_by_set_number(&state.db, "21034")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.source, Source::Catalog);
}

#[tokio::test]
async fn add_set_rejects_malformed_numbers_without_io() {
    let catalog = FakeCatalog::new(CatalogMode::NotFound);
    let search = FakeSearch::new(SearchMode::Fail);
    let state = test_state(catalog.clone(), search.clone()).await;
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets",
            json!({ "setNumber": "not-a-set" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(catalog.call_count(), 0);
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn add_set_duplicate_returns_conflict_and_keeps_storage() {
    let state = catalog_hit_state().await;
    let app = build_router(state.clone());

    bricklog_web::db::sets::insert_entry(&state.db, "21034", Source::Catalog, 100, false)
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets",
            json!({ "setNumber": "21034" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let entries = bricklog_web::db::sets::list_entries(&state.db).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn add_set_unknown_number_returns_not_found() {
    let catalog = FakeCatalog::new(CatalogMode::NotFound);
    let search = FakeSearch::new(SearchMode::Lines(generic_snippets("99999")));
    let state = test_state(catalog, search).await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets",
            json!({ "setNumber": "99999" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let entries = bricklog_web::db::sets::list_entries(&state.db).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn validate_reports_format_errors_in_the_body() {
    let app = build_router(catalog_hit_state().await);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets/validate",
            json!({ "setNumber": "abc" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn validate_previews_catalog_data() {
    let app = build_router(catalog_hit_state().await);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets/validate",
            json!({ "setNumber": "21034" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["setData"]["name"], "London Skyline");
    assert!(body.get("requiresConfirmation").is_none());
}

#[tokio::test]
async fn validate_previews_web_search_fallback() {
    let catalog = FakeCatalog::new(CatalogMode::NotFound);
    let search = FakeSearch::new(SearchMode::Lines(ducati_snippets()));
    let state = test_state(catalog, search).await;
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sets/validate",
            json!({ "setNumber": "42107" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["requiresConfirmation"], false);
    assert_eq!(body["setData"]["source"], "web_search");
    assert_eq!(body["setData"]["num_parts"], 646);
    assert!(body["setData"]["name"]
        .as_str()
        .unwrap()
        .contains("Ducati Panigale"));
}

#[tokio::test]
async fn confirm_web_search_persists_with_provenance() {
    let catalog = FakeCatalog::new(CatalogMode::NotFound);
    let search = FakeSearch::new(SearchMode::Fail);
    let state = test_state(catalog, search).await;
    let app = build_router(state.clone());

    let payload = json!({
        "setNumber": "42107",
        "name": "Ducati Panigale V4 R",
        "year": 2019,
        "num_parts": 646,
        "theme": "Technic",
        "set_img_url": "",
        "confidence": 80
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/sets/web-search", payload.clone()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["source"], "web_search");
    assert_eq!(body["confidence"], 80);
    assert_eq!(body["manualOverride"], false);
    assert_eq!(body["set_num"], "42107-1");

    let stored = bricklog_web::db::sets::find_by_set_number(&state.db, "42107")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.source, Source::WebSearch);
    assert_eq!(stored.confidence, 80);
    assert!(!stored.manual_override);

    // A second confirmation of the same set conflicts
    let response = app
        .oneshot(json_request("POST", "/api/sets/web-search", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn confirm_web_search_validates_the_payload() {
    let catalog = FakeCatalog::new(CatalogMode::NotFound);
    let search = FakeSearch::new(SearchMode::Fail);
    let state = test_state(catalog, search).await;
    let app = build_router(state);

    let cases = [
        json!({ "setNumber": "42107", "name": "", "year": 2019, "num_parts": 646, "confidence": 80 }),
        json!({ "setNumber": "42107", "name": "X Y Z", "year": 1900, "num_parts": 646, "confidence": 80 }),
        json!({ "setNumber": "42107", "name": "X Y Z", "year": 2019, "num_parts": 99999, "confidence": 80 }),
        json!({ "setNumber": "42107", "name": "X Y Z", "year": 2019, "num_parts": 646, "confidence": 800 }),
    ];

    for case in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/sets/web-search", case.clone()))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "payload {} should be rejected",
            case
        );
    }
}

#[tokio::test]
async fn delete_removes_entry_then_404s() {
    let state = catalog_hit_state().await;
    let app = build_router(state.clone());

    let entry = bricklog_web::db::sets::insert_entry(&state.db, "21034", Source::Catalog, 100, false)
        .await
        .unwrap();

    let uri = format!("/api/sets/{}", entry.id);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(bricklog_web::db::sets::find_by_id(&state.db, entry.id)
        .await
        .unwrap()
        .is_none());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_enriches_entries_newest_first() {
    let state = catalog_hit_state().await;
    let app = build_router(state.clone());

    bricklog_web::db::sets::insert_entry(&state.db, "10001", Source::Catalog, 100, false)
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    bricklog_web::db::sets::insert_entry(&state.db, "10002", Source::Catalog, 100, false)
        .await
        .unwrap();

    let response = app
        .oneshot(Request::builder().uri("/api/sets").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["setNumber"], "10002");
    assert_eq!(entries[1]["setNumber"], "10001");
    // Catalog fake answers for every number; both entries are enriched
    assert_eq!(entries[0]["name"], "London Skyline");
    assert_eq!(entries[0]["isStored"], true);
    assert!(entries[0].get("apiError").is_none());
}

#[tokio::test]
async fn list_degrades_entries_when_resolution_fails() {
    let catalog = FakeCatalog::new(CatalogMode::NotFound);
    let search = FakeSearch::new(SearchMode::Fail);
    let state = test_state(catalog, search).await;
    let app = build_router(state.clone());

    bricklog_web::db::sets::insert_entry(&state.db, "99999", Source::Catalog, 100, false)
        .await
        .unwrap();

    let response = app
        .oneshot(Request::builder().uri("/api/sets").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Set 99999");
    assert_eq!(entries[0]["apiError"], true);
    assert_eq!(entries[0]["year"], 0);

    // The failure is recorded for /health diagnostics
    assert!(state.last_error.read().await.is_some());
}
