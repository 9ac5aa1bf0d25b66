//! Field extractors for the web-search fallback
//!
//! Best-effort pattern matching over raw search-result text. All functions
//! here are pure: same text in, same fields out.

pub mod snippet_extractor;

pub use snippet_extractor::{
    extract_fields, extract_name, extract_pieces, extract_theme, extract_year, placeholder_name,
    ExtractedFields, PLACEHOLDER_PREFIX,
};
