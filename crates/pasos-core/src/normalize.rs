//! Text canonicalization applied to queries and record fields alike.
//!
//! Comparisons elsewhere in the crate must never mix normalized and raw text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase, strip diacritics, trim surrounding whitespace.
///
/// Deterministic and idempotent; empty input yields empty output.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
