//! Validation layer for web-search derived records

pub mod confidence_scorer;

pub use confidence_scorer::ConfidenceScorer;
