//! Database access for bricklog-web
//!
//! SQLite via sqlx; tables are created on startup if missing.

pub mod sets;
pub mod settings;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Opens (or creates) the database file inside the root folder.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize bricklog tables
///
/// Creates the sets and settings tables if they don't exist.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            set_number TEXT NOT NULL UNIQUE,
            source TEXT NOT NULL DEFAULT 'catalog',
            confidence INTEGER NOT NULL DEFAULT 100,
            manual_override INTEGER NOT NULL DEFAULT 0,
            date_added TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Settings table for API key persistence
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (sets, settings)");

    Ok(())
}
