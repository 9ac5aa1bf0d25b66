//! bricklog-web - LEGO collection tracking service
//!
//! Serves the collection REST API on a local port, backed by SQLite and
//! the Rebrickable catalog with a web-search fallback.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bricklog_web::services::{HttpSearchClient, RebrickableClient, SetResolver};
use bricklog_web::AppState;

const DEFAULT_BIND: &str = "127.0.0.1:5741";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting bricklog-web (collection tracker)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve root folder (CLI arg > env > TOML > platform default)
    let args: Vec<String> = std::env::args().collect();
    let root_folder = bricklog_common::config::resolve_root_folder(args.get(1).map(String::as_str));

    // Step 2: Create root folder directory if missing
    bricklog_common::config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    // Step 3: Open or create database
    let db_path = bricklog_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let db_pool = bricklog_web::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Step 4: Resolve API key (Database > ENV > TOML) and build clients
    let toml_config = bricklog_common::config::load_toml_config()?;
    let api_key =
        bricklog_web::config::resolve_rebrickable_api_key(&db_pool, &toml_config).await?;

    let catalog = RebrickableClient::new(api_key)?;

    let search_endpoint = std::env::var("BRICKLOG_SEARCH_ENDPOINT")
        .ok()
        .or_else(|| toml_config.search_endpoint.clone());
    if search_endpoint.is_none() {
        info!("No search endpoint configured; web-search fallback disabled");
    }
    let search = HttpSearchClient::new(search_endpoint)?;

    let resolver = Arc::new(SetResolver::new(Arc::new(catalog), Arc::new(search)));

    // Create application state and router
    let state = AppState::new(db_pool, resolver);
    let app = bricklog_web::build_router(state);

    // Start server
    let bind = std::env::var("BRICKLOG_BIND")
        .ok()
        .or_else(|| toml_config.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
