//! Search snippet field extraction
//!
//! Pulls name, year, piece count and theme out of unstructured search-result
//! text for a target set number. The patterns are heuristic by design: a
//! miss degrades to a placeholder or zero value and the confidence scorer
//! decides what that is worth.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::SetNumber;

/// Prefix of the synthetic fallback name, also used by the confidence
/// scorer to recognize a placeholder
pub const PLACEHOLDER_PREFIX: &str = "LEGO Set";

/// Known theme names, in priority order. First substring hit wins.
const THEMES: [&str; 18] = [
    "Technic",
    "Star Wars",
    "City",
    "Creator",
    "Friends",
    "Ninjago",
    "Harry Potter",
    "Marvel",
    "DC",
    "Architecture",
    "Ideas",
    "Speed Champions",
    "Jurassic World",
    "Disney",
    "Minecraft",
    "Batman",
    "Castle",
    "Space",
];

/// Piece-count patterns, tried in order; first in-range hit wins
static PIECE_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)(\d{2,5})\s*pieces?").unwrap(),
        Regex::new(r"(?i)(\d{2,5})\s*pcs").unwrap(),
        Regex::new(r"(?i)(\d{2,5})\s*elements?").unwrap(),
    ]
});

/// 4-digit tokens that look like years
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20)\d{2}").unwrap());

/// Leading "Something Set/Model/Kit " noise in front of an extracted name
static NAME_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\w+\s+(Set|Model|Kit)\s+").unwrap());

/// Earliest plausible release year (the modern brick patent)
const MIN_YEAR: i32 = 1958;

/// Fields pulled out of search text, before scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub name: String,
    pub year: i32,
    pub num_parts: i64,
    pub theme: String,
}

/// Synthetic name used when no pattern matched
pub fn placeholder_name(set_number: &SetNumber) -> String {
    format!("{} {}", PLACEHOLDER_PREFIX, set_number)
}

/// Run all extractors against the combined snippet text
pub fn extract_fields(text: &str, set_number: &SetNumber, current_year: i32) -> ExtractedFields {
    ExtractedFields {
        name: extract_name(text, set_number),
        year: extract_year(text, current_year),
        num_parts: extract_pieces(text),
        theme: extract_theme(text),
    }
}

/// Extract a set name, falling back to `"LEGO Set <id>"`
///
/// Patterns are tried in order; the first match that survives cleanup and
/// the 3..100 length window wins.
pub fn extract_name(text: &str, set_number: &SetNumber) -> String {
    let id = set_number.as_str();
    let patterns = [
        format!(
            r"(?i)LEGO\s+(?:Technic\s+|Star Wars\s+|City\s+|Creator\s+)?([^(]+?)(?:\s+{}|\s+\(|$)",
            id
        ),
        format!(r"(?i){}[^a-zA-Z]*([A-Z][^(•|]+?)(?:\s*\(|$)", id),
        format!(r"(?i)Set\s+{}[^:]*:\s*([^-•(]+)", id),
    ];

    for pattern in &patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(captures) = re.captures(text) {
            if let Some(m) = captures.get(1) {
                let normalized = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
                let name = NAME_PREFIX_RE.replace(&normalized, "").trim().to_string();
                if name.len() > 3 && name.len() < 100 {
                    return name;
                }
            }
        }
    }

    placeholder_name(set_number)
}

/// Extract a piece count, or 0 when nothing plausible is found
///
/// A match is only accepted inside [10, 20000]; an out-of-range number
/// falls through to the next pattern.
pub fn extract_pieces(text: &str) -> i64 {
    for re in PIECE_RES.iter() {
        if let Some(captures) = re.captures(text) {
            if let Some(m) = captures.get(1) {
                if let Ok(pieces) = m.as_str().parse::<i64>() {
                    if (10..=20000).contains(&pieces) {
                        return pieces;
                    }
                }
            }
        }
    }
    0
}

/// Extract the most recent plausible release year, or 0
///
/// Collects all 19xx/20xx tokens, keeps those in [1958, current_year + 2]
/// and returns the maximum. Announcement snippets often mention earlier
/// sets, so the newest valid year is the best guess.
pub fn extract_year(text: &str, current_year: i32) -> i32 {
    YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .filter(|y| (MIN_YEAR..=current_year + 2).contains(y))
        .max()
        .unwrap_or(0)
}

/// Extract the first known theme found in the text, or an empty string
pub fn extract_theme(text: &str) -> String {
    let lower = text.to_lowercase();
    THEMES
        .iter()
        .find(|theme| lower.contains(&theme.to_lowercase()))
        .map(|theme| theme.to_string())
        .unwrap_or_default()
}
