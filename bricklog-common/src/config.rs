//! Configuration loading and root folder resolution
//!
//! The root folder holds the SQLite database and anything else the service
//! writes. Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `BRICKLOG_ROOT` environment variable
//! 3. TOML config file `root_folder` key
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "BRICKLOG_ROOT";

/// TOML configuration file contents
///
/// All keys are optional; anything absent falls back to environment
/// variables or compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for database and service data
    pub root_folder: Option<String>,
    /// Rebrickable API key (lowest-priority source, see bricklog-web config)
    pub rebrickable_api_key: Option<String>,
    /// Web search endpoint used by the set-resolution fallback
    pub search_endpoint: Option<String>,
    /// Listen address, e.g. "127.0.0.1:5741"
    pub bind: Option<String>,
}

/// Resolve the root folder following the priority order above
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/bricklog
        dirs::data_local_dir()
            .map(|d| d.join("bricklog"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/bricklog"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/bricklog
        dirs::data_dir()
            .map(|d| d.join("bricklog"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/bricklog"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\bricklog
        dirs::data_local_dir()
            .map(|d| d.join("bricklog"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\bricklog"))
    } else {
        PathBuf::from("./bricklog_data")
    }
}

/// Get configuration file path for the platform (~/.config/bricklog/config.toml)
pub fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("bricklog").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load the TOML config file, treating a missing file as empty config
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write the TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Database path inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join("bricklog.db")
}
