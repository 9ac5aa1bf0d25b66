//! Collection entry database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::CollectionEntry;
use crate::types::Source;

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<CollectionEntry> {
    let source_str: String = row.get("source");
    let date_str: String = row.get("date_added");
    let manual_override: i64 = row.get("manual_override");

    Ok(CollectionEntry {
        id: row.get("id"),
        set_number: row.get("set_number"),
        source: source_str.parse::<Source>()?,
        confidence: row.get("confidence"),
        manual_override: manual_override != 0,
        date_added: DateTime::parse_from_rfc3339(&date_str)?.with_timezone(&Utc),
    })
}

/// Insert a collection entry with explicit provenance
pub async fn insert_entry(
    pool: &SqlitePool,
    set_number: &str,
    source: Source,
    confidence: i64,
    manual_override: bool,
) -> Result<CollectionEntry> {
    let date_added = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO sets (set_number, source, confidence, manual_override, date_added)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(set_number)
    .bind(source.as_str())
    .bind(confidence)
    .bind(manual_override as i64)
    .bind(date_added.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(CollectionEntry {
        id: result.last_insert_rowid(),
        set_number: set_number.to_string(),
        source,
        confidence,
        manual_override,
        date_added,
    })
}

/// Insert an entry with default provenance (bulk import path)
pub async fn insert_basic(pool: &SqlitePool, set_number: &str) -> Result<CollectionEntry> {
    insert_entry(pool, set_number, Source::Catalog, 100, false).await
}

/// Load an entry by set number
pub async fn find_by_set_number(
    pool: &SqlitePool,
    set_number: &str,
) -> Result<Option<CollectionEntry>> {
    let row = sqlx::query(
        r#"
        SELECT id, set_number, source, confidence, manual_override, date_added
        FROM sets
        WHERE set_number = ?
        "#,
    )
    .bind(set_number)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

/// Load an entry by numeric id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<CollectionEntry>> {
    let row = sqlx::query(
        r#"
        SELECT id, set_number, source, confidence, manual_override, date_added
        FROM sets
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

/// List all entries, newest first
pub async fn list_entries(pool: &SqlitePool) -> Result<Vec<CollectionEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT id, set_number, source, confidence, manual_override, date_added
        FROM sets
        ORDER BY date_added DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(entry_from_row).collect()
}

/// Count collection entries
pub async fn count_entries(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM sets")
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

/// Delete an entry by numeric id
pub async fn delete_entry(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM sets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
