//! Shared error types for the bricklog binaries

use thiserror::Error;

/// Shared result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the config and persistence plumbing
///
/// The web service maps these onto HTTP responses at its own edge; the
/// import binary reports them directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem access failed (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration missing, unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}
