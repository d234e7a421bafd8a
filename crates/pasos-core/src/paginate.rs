//! Transport-size chunking and per-user pagination cursors.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::{CrossingRecord, UserId};

/// Start of every record block in formatted output.
pub const BLOCK_START: &str = "*Paso internacional ";

/// Start of every group header line.
const HEADER_START: &str = "👉 ";

/// Split a formatted message into chunks of at most `max_len` bytes,
/// breaking only at block boundaries: a blank line followed by a record
/// block or a group header. Chunks rejoined with a blank line reproduce the
/// input exactly (a record field may itself be empty, so not every blank
/// line is a boundary).
pub fn split_message(msg: &str, max_len: usize) -> Vec<String> {
    if msg.len() <= max_len {
        return vec![msg.to_string()];
    }

    let mut parts: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for segment in segments(msg) {
        for piece in fit(segment, max_len) {
            if !buffer.is_empty() && buffer.len() + 2 + piece.len() > max_len {
                parts.push(std::mem::take(&mut buffer));
            }
            if !buffer.is_empty() {
                buffer.push_str("\n\n");
            }
            buffer.push_str(&piece);
        }
    }
    if !buffer.is_empty() {
        parts.push(buffer);
    }
    parts
}

/// Cut the message before each block or header start found after a blank
/// line. A header stays glued to the blocks below it.
fn segments(msg: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;

    for (idx, _) in msg.match_indices("\n\n") {
        if idx < start {
            continue;
        }
        let rest = &msg[idx + 2..];
        if rest.starts_with(BLOCK_START) || rest.starts_with(HEADER_START) {
            out.push(&msg[start..idx]);
            start = idx + 2;
        }
    }
    out.push(&msg[start..]);
    out
}

/// Last-resort char fold for a single block larger than the transport limit.
fn fit(segment: &str, max_len: usize) -> Vec<String> {
    if segment.len() <= max_len {
        return vec![segment.to_string()];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    for ch in segment.chars() {
        if current.len() + ch.len_utf8() > max_len {
            out.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Pending continuation for one user: the full ordered match list and the
/// next slice to serve.
#[derive(Clone, Debug)]
pub struct PaginationState {
    pub records: Vec<CrossingRecord>,
    pub next_offset: usize,
    pub page_size: usize,
}

#[derive(Debug)]
struct Entry {
    state: PaginationState,
    stored_at: Instant,
}

/// Per-user cursor store. Entries expire after `ttl` and eviction happens on
/// access, so a dead cursor simply falls back to a fresh query. Writes are
/// last-write-wins per user.
#[derive(Debug)]
pub struct PaginationStore {
    ttl: Duration,
    entries: Mutex<HashMap<UserId, Entry>>,
}

impl PaginationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn put(&self, user: &UserId, state: PaginationState) {
        self.put_at(user, state, Instant::now());
    }

    pub fn put_at(&self, user: &UserId, state: PaginationState, now: Instant) {
        let mut entries = self.lock();
        entries.retain(|_, e| now.duration_since(e.stored_at) < self.ttl);
        entries.insert(user.clone(), Entry { state, stored_at: now });
    }

    /// Remove and return the user's cursor, if present and not expired.
    pub fn take(&self, user: &UserId) -> Option<PaginationState> {
        self.take_at(user, Instant::now())
    }

    pub fn take_at(&self, user: &UserId, now: Instant) -> Option<PaginationState> {
        let entry = self.lock().remove(user)?;
        (now.duration_since(entry.stored_at) < self.ttl).then(|| entry.state)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
