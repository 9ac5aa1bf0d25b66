//! Resolution pipeline output

use crate::types::{CatalogSet, ProvisionalSet, Source};

/// Outcome of a successful set resolution
///
/// Catalog records are authoritative (implicit confidence 100, never
/// gated); web-search records carry their heuristic score and may require
/// user confirmation before persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Catalog(CatalogSet),
    WebSearch(ProvisionalSet),
}

impl Resolution {
    pub fn source(&self) -> Source {
        match self {
            Resolution::Catalog(_) => Source::Catalog,
            Resolution::WebSearch(_) => Source::WebSearch,
        }
    }

    pub fn confidence(&self) -> u8 {
        match self {
            Resolution::Catalog(_) => 100,
            Resolution::WebSearch(provisional) => provisional.confidence,
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        match self {
            Resolution::Catalog(_) => false,
            Resolution::WebSearch(provisional) => provisional.requires_confirmation,
        }
    }
}
