//! Confidence scoring for extracted set records
//!
//! Rates an extracted record against five equal-weight validity checks and
//! decides whether a human has to confirm it before persistence. The
//! weights and the 85 confirmation threshold are heuristics inherited from
//! observed behavior, not a verified accuracy model; they gate user-visible
//! flow and must not drift.

use chrono::{Datelike, Utc};

use crate::extractors::{placeholder_name, ExtractedFields, PLACEHOLDER_PREFIX};
use crate::types::{ProvisionalSet, SetNumber, Source};

/// Number of validity checks; each contributes 20 points
const CHECK_COUNT: usize = 5;

/// Scores extracted fields into a complete [`ProvisionalSet`]
///
/// Always produces a full record: missing fields are defaulted (placeholder
/// name, zero year/pieces, empty image) before scoring, so the only
/// possible confidence values are 0, 20, 40, 60, 80 and 100.
pub struct ConfidenceScorer {
    /// Records scoring below this require explicit user confirmation
    confirm_threshold: u8,
}

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self {
            confirm_threshold: 85,
        }
    }

    /// Override the confirmation threshold (tests only use this so far)
    pub fn with_confirm_threshold(confirm_threshold: u8) -> Self {
        Self { confirm_threshold }
    }

    /// Score extracted fields for the given set number
    pub fn finalize(&self, fields: ExtractedFields, set_number: &SetNumber) -> ProvisionalSet {
        let current_year = Utc::now().year();
        let set_num = set_number.catalog_num();

        let name = if fields.name.trim().is_empty() {
            placeholder_name(set_number)
        } else {
            fields.name
        };
        let year = fields.year;
        let num_parts = fields.num_parts;
        let theme = fields.theme;

        let checks = [
            // Name present and not the synthetic placeholder
            name.len() > 3 && !name.contains(PLACEHOLDER_PREFIX),
            // Piece count plausible (exclusive bounds)
            num_parts > 10 && num_parts < 20000,
            // Year within the catalog's lifetime, allowing announcements
            year >= 1958 && year <= current_year + 2,
            // Catalog-style identifier still contains what the user asked for
            set_num.contains(set_number.as_str()),
            // Some theme was recognized
            !theme.is_empty(),
        ];

        let passed = checks.iter().filter(|check| **check).count();
        let confidence = ((passed as f64 / CHECK_COUNT as f64) * 100.0).round() as u8;

        ProvisionalSet {
            set_num,
            name,
            year,
            num_parts,
            theme,
            set_img_url: String::new(),
            confidence,
            source: Source::WebSearch,
            requires_confirmation: confidence < self.confirm_threshold,
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}
