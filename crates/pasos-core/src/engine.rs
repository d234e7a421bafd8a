//! Pure orchestration of the matching pipeline:
//! classify -> match -> group -> format -> chunk/page.
//!
//! The engine never performs I/O. Fetching the record snapshot and
//! delivering the output belong to the adapter crates; the only state held
//! here is the injected per-user pagination store.

use std::time::Duration;

use crate::classify::Query;
use crate::config::Config;
use crate::domain::{CrossingRecord, UserId};
use crate::formatting;
use crate::grouping;
use crate::matcher;
use crate::paginate::{self, PaginationState, PaginationStore};

/// Continuation token carried by the "load more" quick-reply button.
pub const CONTINUATION_TOKEN: &str = "ver_mas";

/// Normalized texts that continue a pending pagination.
const LOAD_MORE_TEXTS: [&str; 3] = ["ver mas", "mas", CONTINUATION_TOKEN];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationMode {
    /// Format everything, split into chunks below the transport limit.
    Chunked,
    /// Serve `page_size` records per message with a continuation cursor.
    Paged,
}

/// One reply, ready for ordered delivery. `continuation` is set when more
/// records remain behind a cursor; the transport should offer a
/// "load more" action carrying the token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outgoing {
    pub chunks: Vec<String>,
    pub continuation: Option<String>,
}

impl Outgoing {
    fn plain(text: String) -> Self {
        Self {
            chunks: vec![text],
            continuation: None,
        }
    }
}

pub struct Engine {
    min_query_len: usize,
    max_chunk_len: usize,
    page_size: usize,
    mode: PaginationMode,
    store: PaginationStore,
}

impl Engine {
    pub fn new(
        min_query_len: usize,
        max_chunk_len: usize,
        page_size: usize,
        mode: PaginationMode,
        pagination_ttl: Duration,
    ) -> Self {
        Self {
            min_query_len,
            max_chunk_len,
            page_size,
            mode,
            store: PaginationStore::new(pagination_ttl),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let mode = if cfg.paged_results {
            PaginationMode::Paged
        } else {
            PaginationMode::Chunked
        };
        Self::new(
            cfg.min_query_len,
            cfg.max_chunk_len,
            cfg.page_size,
            mode,
            cfg.pagination_ttl,
        )
    }

    pub fn classify(&self, raw: &str) -> Query {
        Query::classify(raw, self.min_query_len)
    }

    /// Serve the next pending page if `normalized_text` is a load-more
    /// request and a cursor exists for this user. Without a cursor the text
    /// falls through to normal classification.
    pub fn try_continue(&self, user: &UserId, normalized_text: &str) -> Option<Outgoing> {
        if !LOAD_MORE_TEXTS.contains(&normalized_text) {
            return None;
        }
        let state = self.store.take(user)?;
        Some(self.serve_page(user, state))
    }

    pub fn respond(&self, user: &UserId, query: &Query, records: Vec<CrossingRecord>) -> Outgoing {
        if query.is_greeting {
            return Outgoing::plain(formatting::greeting_message());
        }
        if query.is_too_short {
            return Outgoing::plain(formatting::too_short_message(self.min_query_len));
        }

        let matches = matcher::select(query, records);
        tracing::debug!(
            query = %query.normalized_text,
            matched = matches.len(),
            "query matched"
        );

        let groups = grouping::group(matches);
        if groups.is_empty() {
            return Outgoing::plain(formatting::no_match_message(&query.raw_text));
        }

        match self.mode {
            PaginationMode::Chunked => Outgoing {
                chunks: paginate::split_message(
                    &formatting::render_groups(&groups),
                    self.max_chunk_len,
                ),
                continuation: None,
            },
            PaginationMode::Paged => {
                let total: usize = groups.iter().map(|g| g.records.len()).sum();
                if total <= self.page_size {
                    return Outgoing::plain(formatting::render_groups(&groups));
                }
                let records: Vec<CrossingRecord> =
                    groups.into_iter().flat_map(|g| g.records).collect();
                self.serve_page(
                    user,
                    PaginationState {
                        records,
                        next_offset: 0,
                        page_size: self.page_size,
                    },
                )
            }
        }
    }

    fn serve_page(&self, user: &UserId, state: PaginationState) -> Outgoing {
        let total = state.records.len();
        let start = state.next_offset.min(total);
        let end = (start + state.page_size).min(total);

        let blocks = state.records[start..end]
            .iter()
            .map(formatting::render_record)
            .collect::<Vec<_>>()
            .join("\n\n");

        if end < total {
            let body = format!("{blocks}\n\n{}", formatting::page_footer(start, end, total));
            self.store.put(
                user,
                PaginationState {
                    next_offset: end,
                    ..state
                },
            );
            Outgoing {
                chunks: vec![body],
                continuation: Some(CONTINUATION_TOKEN.to_string()),
            }
        } else {
            Outgoing::plain(blocks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(600);

    fn user() -> UserId {
        UserId("5491100000000".to_string())
    }

    fn record(name: &str, province: &str, country: &str, status: &str) -> CrossingRecord {
        CrossingRecord {
            name: name.to_string(),
            province: province.to_string(),
            country: country.to_string(),
            status: status.to_string(),
            localities: format!("{name} - frontera"),
            last_updated: "hoy".to_string(),
        }
    }

    fn sample() -> Vec<CrossingRecord> {
        vec![
            record("Cristo Redentor", "Mendoza", "Chile", "Abierto"),
            record("Iguazú", "Misiones", "Brasil", "Abierto"),
            record("Santo Tomé", "Corrientes", "Brasil", "Cerrado"),
        ]
    }

    fn chunked() -> Engine {
        Engine::new(4, 4000, 10, PaginationMode::Chunked, TTL)
    }

    fn paged(page_size: usize) -> Engine {
        Engine::new(4, 4000, page_size, PaginationMode::Paged, TTL)
    }

    #[test]
    fn greeting_short_circuits() {
        let engine = chunked();
        let q = engine.classify("hola");
        let out = engine.respond(&user(), &q, Vec::new());
        assert_eq!(out.chunks.len(), 1);
        assert!(out.chunks[0].starts_with("¡Hola! 👋"));
    }

    #[test]
    fn too_short_query_gets_fixed_reply() {
        let engine = chunked();
        let q = engine.classify("ag");
        let out = engine.respond(&user(), &q, sample());
        assert!(out.chunks[0].contains("al menos 4 letras"));
    }

    #[test]
    fn open_brazil_query_is_and_combined_under_one_header() {
        let engine = chunked();
        let q = engine.classify("abiertos con brasil");
        let out = engine.respond(&user(), &q, sample());

        assert_eq!(out.chunks.len(), 1);
        let msg = &out.chunks[0];
        assert!(msg.starts_with("👉 *Pasos internacionales abiertos con Brasil*"));
        assert!(msg.contains("Iguazú"));
        assert!(!msg.contains("Santo Tomé"));
    }

    #[test]
    fn todos_returns_every_record_without_headers() {
        let engine = chunked();
        let q = engine.classify("todos");
        let out = engine.respond(&user(), &q, sample());

        let msg = &out.chunks[0];
        assert!(msg.starts_with("*Paso internacional Cristo Redentor*"));
        assert!(!msg.contains("👉"));
        assert_eq!(msg.matches("*Paso internacional ").count(), 3);
    }

    #[test]
    fn no_match_reply_quotes_the_raw_text() {
        let engine = chunked();
        let q = engine.classify("Tierra del Fuego Oriental");
        let out = engine.respond(&user(), &q, Vec::new());
        assert!(out.chunks[0].contains("'Tierra del Fuego Oriental'"));
    }

    #[test]
    fn chunked_mode_never_sets_continuation() {
        let engine = chunked();
        let q = engine.classify("todos");
        let out = engine.respond(&user(), &q, sample());
        assert_eq!(out.continuation, None);
    }

    #[test]
    fn paged_mode_slices_and_resumes_until_exhausted() {
        let engine = paged(10);
        let u = user();
        let records: Vec<CrossingRecord> = (0..23)
            .map(|i| record(&format!("Paso {i:02}"), "Salta", "Chile", "Abierto"))
            .collect();

        let q = engine.classify("todos");
        let first = engine.respond(&u, &q, records);
        assert_eq!(first.continuation.as_deref(), Some(CONTINUATION_TOKEN));
        assert!(first.chunks[0].contains("Paso 00"));
        assert!(first.chunks[0].contains("Paso 09"));
        assert!(!first.chunks[0].contains("Paso 10"));
        assert!(first.chunks[0].contains("Mostrando 1-10 de 23"));

        let second = engine.try_continue(&u, "ver mas").expect("second page");
        assert!(second.chunks[0].contains("Paso 10"));
        assert!(second.chunks[0].contains("Paso 19"));
        assert_eq!(second.continuation.as_deref(), Some(CONTINUATION_TOKEN));

        let third = engine.try_continue(&u, "ver mas").expect("third page");
        assert!(third.chunks[0].contains("Paso 20"));
        assert!(third.chunks[0].contains("Paso 22"));
        assert_eq!(third.continuation, None);

        // Cursor is gone after the final slice.
        assert!(engine.try_continue(&u, "ver mas").is_none());
    }

    #[test]
    fn paged_mode_small_result_keeps_group_rendering() {
        let engine = paged(10);
        let q = engine.classify("abiertos con brasil");
        let out = engine.respond(&user(), &q, sample());
        assert!(out.chunks[0].starts_with("👉"));
        assert_eq!(out.continuation, None);
    }

    #[test]
    fn try_continue_ignores_non_load_more_text() {
        let engine = paged(1);
        let u = user();
        let q = engine.classify("todos");
        engine.respond(&u, &q, sample());
        assert!(engine.try_continue(&u, "chile").is_none());
    }

    #[test]
    fn continuation_token_itself_continues() {
        let engine = paged(2);
        let u = user();
        let q = engine.classify("todos");
        let first = engine.respond(&u, &q, sample());
        assert!(first.continuation.is_some());

        let next = engine.try_continue(&u, CONTINUATION_TOKEN).expect("next page");
        assert!(next.chunks[0].contains("Santo Tomé"));
    }
}
