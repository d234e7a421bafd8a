use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_SCRAPER_URL: &str =
    "https://scraper-pasos-ar-184988071501.southamerica-east1.run.app/scrapear";
const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com/v20.0";

/// Typed configuration for the bot, loaded from environment variables
/// (optionally seeded from a local `.env` file).
#[derive(Clone, Debug)]
pub struct Config {
    // WhatsApp Cloud API
    pub whatsapp_token: String,
    pub phone_id: String,
    pub verify_token: String,
    pub graph_api_base: String,

    // Record source
    pub scraper_url: String,
    pub fetch_timeout: Duration,

    // HTTP server
    pub bind_addr: String,

    // Matching / delivery limits
    pub min_query_len: usize,
    pub max_chunk_len: usize,
    pub page_size: usize,
    pub paged_results: bool,
    pub pagination_ttl: Duration,
    pub send_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let whatsapp_token = require_env("WHATSAPP_TOKEN")?;
        let phone_id = require_env("PHONE_ID")?;
        let verify_token = require_env("VERIFY_TOKEN")?;

        let graph_api_base = env_str("GRAPH_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_GRAPH_API_BASE.to_string());
        let scraper_url = env_str("SCRAPER_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_SCRAPER_URL.to_string());
        let bind_addr = env_str("BIND_ADDR")
            .and_then(non_empty)
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        // Matching / delivery limits
        let min_query_len = env_usize("MIN_QUERY_LEN").unwrap_or(4).max(1);
        let max_chunk_len = env_usize("MAX_CHUNK_LEN").unwrap_or(4000);
        let page_size = env_usize("PAGE_SIZE").unwrap_or(10).max(1);
        let paged_results = env_bool("PAGED_RESULTS").unwrap_or(false);
        let pagination_ttl = Duration::from_secs(env_u64("PAGINATION_TTL_SECS").unwrap_or(600));

        // The scraper and the Cloud API are both slow on cold starts.
        let fetch_timeout = Duration::from_secs(env_u64("FETCH_TIMEOUT_SECS").unwrap_or(40));
        let send_timeout = Duration::from_secs(env_u64("SEND_TIMEOUT_SECS").unwrap_or(40));

        Ok(Self {
            whatsapp_token,
            phone_id,
            verify_token,
            graph_api_base,
            scraper_url,
            fetch_timeout,
            bind_addr,
            min_query_len,
            max_chunk_len,
            page_size,
            paged_results,
            pagination_ttl,
            send_timeout,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    env_str(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
