//! Intent classification for one incoming message.

use crate::normalize::normalize;

/// Fixed greeting set. "hola" additionally matches by containment, so
/// "hola, como va?" still greets back instead of running a search.
const GREETINGS: [&str; 5] = ["hola", "hi", "buenas", "buen dia", "buenos dias"];

/// Whitespace token that requests the full record set.
const ALL_KEYWORD: &str = "todos";

/// Explicit open/closed request detected in the query text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    Open,
    Closed,
}

impl StatusFilter {
    /// Normalized keyword tested against query and record status text.
    /// Covers the plural forms by containment ("abiertos" contains "abierto").
    pub fn keyword(self) -> &'static str {
        match self {
            StatusFilter::Open => "abierto",
            StatusFilter::Closed => "cerrado",
        }
    }

    /// Plural label used in combined group headers.
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Open => "abiertos",
            StatusFilter::Closed => "cerrados",
        }
    }

    pub fn matches(self, normalized_status: &str) -> bool {
        normalized_status.contains(self.keyword())
    }
}

/// One classified user message. Constructed once, never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Query {
    pub raw_text: String,
    pub normalized_text: String,
    pub is_greeting: bool,
    pub is_too_short: bool,
    pub status_filter: Option<StatusFilter>,
    pub wants_all: bool,
    /// Whitespace-delimited tokens of length >= the minimum query length,
    /// used for loose name/province matching and exact country matching.
    pub name_tokens: Vec<String>,
}

impl Query {
    pub fn classify(raw: &str, min_len: usize) -> Self {
        let normalized_text = normalize(raw);

        let is_greeting = GREETINGS.contains(&normalized_text.as_str())
            || normalized_text.contains("hola");
        if is_greeting {
            return Self::short_circuit(raw, normalized_text, true, false);
        }

        if normalized_text.chars().count() < min_len {
            return Self::short_circuit(raw, normalized_text, false, true);
        }

        // "abierto" is checked before "cerrado"; first match wins.
        let status_filter = if normalized_text.contains(StatusFilter::Open.keyword()) {
            Some(StatusFilter::Open)
        } else if normalized_text.contains(StatusFilter::Closed.keyword()) {
            Some(StatusFilter::Closed)
        } else {
            None
        };

        let wants_all = normalized_text.split_whitespace().any(|t| t == ALL_KEYWORD);

        let name_tokens = normalized_text
            .split_whitespace()
            .filter(|t| t.chars().count() >= min_len)
            .map(str::to_string)
            .collect();

        Self {
            raw_text: raw.to_string(),
            normalized_text,
            is_greeting: false,
            is_too_short: false,
            status_filter,
            wants_all,
            name_tokens,
        }
    }

    /// Greetings and too-short queries are answered without consulting the
    /// record source at all.
    pub fn needs_records(&self) -> bool {
        !self.is_greeting && !self.is_too_short
    }

    fn short_circuit(
        raw: &str,
        normalized_text: String,
        is_greeting: bool,
        is_too_short: bool,
    ) -> Self {
        Self {
            raw_text: raw.to_string(),
            normalized_text,
            is_greeting,
            is_too_short,
            status_filter: None,
            wants_all: false,
            name_tokens: Vec::new(),
        }
    }
}
