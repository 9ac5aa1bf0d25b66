//! Configuration resolution for bricklog-web
//!
//! Provides multi-tier API key resolution with Database → ENV → TOML
//! priority. The database copy is authoritative; keys found only in the
//! environment or the TOML file are migrated into the database on startup
//! so later runs keep working without them.

use bricklog_common::config::{write_toml_config, TomlConfig};
use bricklog_common::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable carrying the Rebrickable API key
pub const API_KEY_ENV_VAR: &str = "BRICKLOG_REBRICKABLE_API_KEY";

/// Resolve the Rebrickable API key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_rebrickable_api_key(
    db: &SqlitePool,
    toml_config: &TomlConfig,
) -> Result<String> {
    let db_key = crate::db::settings::get_rebrickable_api_key(db).await?;
    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    let toml_key = toml_config.rebrickable_api_key.clone();

    let mut sources = Vec::new();
    if db_key.as_deref().is_some_and(is_valid_key) {
        sources.push("database");
    }
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }
    if toml_key.as_deref().is_some_and(is_valid_key) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Rebrickable API key found in multiple sources: {}. Using database (highest priority).",
            sources.join(", ")
        );
    }

    // Resolution priority
    if let Some(key) = db_key {
        if is_valid_key(&key) {
            info!("Rebrickable API key loaded from database");
            return Ok(key);
        }
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Rebrickable API key loaded from environment variable");
            migrate_key_to_database(&key, "environment", db).await?;
            // Env vars are ephemeral; keep a TOML backup as well
            if let Ok(toml_path) = bricklog_common::config::config_file_path() {
                sync_key_to_toml(&key, toml_config, &toml_path)?;
            }
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(&key) {
            info!("Rebrickable API key loaded from TOML config");
            migrate_key_to_database(&key, "TOML", db).await?;
            return Ok(key);
        }
    }

    // No valid key found
    Err(Error::Config(format!(
        "Rebrickable API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: ~/.config/bricklog/config.toml (rebrickable_api_key = \"your-key\")\n\
         \n\
         Obtain an API key at: https://rebrickable.com/api/",
        API_KEY_ENV_VAR
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Persist a key found in ENV/TOML into the database (authoritative copy)
async fn migrate_key_to_database(key: &str, source: &str, db: &SqlitePool) -> Result<()> {
    crate::db::settings::set_rebrickable_api_key(db, key).await?;

    info!("Rebrickable API key migrated from {} to database", source);
    Ok(())
}

/// Sync the API key back to the TOML file as a backup copy
///
/// Best-effort: a failed TOML write is logged, never fatal, since the
/// database write already succeeded.
pub fn sync_key_to_toml(key: &str, toml_config: &TomlConfig, toml_path: &Path) -> Result<()> {
    let mut config = toml_config.clone();
    config.rebrickable_api_key = Some(key.to_string());

    match write_toml_config(&config, toml_path) {
        Ok(()) => {
            info!("Settings synced to TOML: {}", toml_path.display());
            Ok(())
        }
        Err(e) => {
            warn!("TOML write failed (database write succeeded): {}", e);
            Ok(())
        }
    }
}
