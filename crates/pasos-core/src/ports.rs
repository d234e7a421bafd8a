use async_trait::async_trait;

use crate::{domain::CrossingRecord, Result};

/// Hexagonal port for the record snapshot source.
///
/// Implementations perform the actual HTTP fetch; the matching engine never
/// does I/O. Callers treat any error as an empty snapshot, so a flaky
/// scraper degrades to "no results" instead of a user-visible failure.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<CrossingRecord>>;
}
