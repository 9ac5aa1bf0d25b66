//! # Bricklog Common Library
//!
//! Shared code for the bricklog service binaries including:
//! - Error types
//! - Configuration loading and root folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
