//! bricklog-web - LEGO collection tracking service
//!
//! Add a set number, get catalog metadata back (with a web-search fallback
//! when the catalog has nothing), keep the collection in SQLite and serve
//! it over HTTP REST.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod models;
pub mod services;
pub mod types;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::SetResolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Set resolution pipeline (catalog + web-search fallback + cache)
    pub resolver: Arc<SetResolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, resolver: Arc<SetResolver>) -> Self {
        Self {
            db,
            resolver,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::sets_routes())
        .merge(api::web_search_routes())
        .merge(api::health_routes())
        .with_state(state)
}
