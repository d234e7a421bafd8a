//! Record-source adapter over the scraper HTTP API.
//!
//! The scraper returns a JSON array of loosely-typed crossing objects;
//! absent fields deserialize to empty strings in `CrossingRecord`. Any
//! transport or decode failure is returned as an error for the handler
//! layer to downgrade to an empty snapshot.

use std::time::Duration;

use async_trait::async_trait;

use pasos_core::{domain::CrossingRecord, errors::Error, ports::RecordSource, Result};

#[derive(Clone, Debug)]
pub struct ScraperClient {
    http: reqwest::Client,
    url: String,
}

impl ScraperClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("scraper client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RecordSource for ScraperClient {
    async fn fetch_records(&self) -> Result<Vec<CrossingRecord>> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::External(format!("scraper fetch: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::External(format!(
                "scraper returned status {}",
                resp.status()
            )));
        }

        let records: Vec<CrossingRecord> = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("scraper response decode: {e}")))?;

        tracing::debug!(count = records.len(), "fetched crossing snapshot");
        Ok(records)
    }
}
