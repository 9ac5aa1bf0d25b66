//! Settings persistence (key/value)
//!
//! The database copy of a setting is authoritative; see `config` for the
//! full resolution order.

use bricklog_common::Result;
use sqlx::{Row, SqlitePool};

const REBRICKABLE_API_KEY: &str = "rebrickable_api_key";

/// Read a setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("value")))
}

/// Write a setting value (upsert)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read the stored Rebrickable API key
pub async fn get_rebrickable_api_key(pool: &SqlitePool) -> Result<Option<String>> {
    get_setting(pool, REBRICKABLE_API_KEY).await
}

/// Store the Rebrickable API key
pub async fn set_rebrickable_api_key(pool: &SqlitePool, key: &str) -> Result<()> {
    set_setting(pool, REBRICKABLE_API_KEY, key).await
}
