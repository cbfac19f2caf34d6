//! leanStream playlist history adapter
//!
//! leanStream players expose `<player>/<callsign>/history`, a JSON array of
//! recently played items, newest first:
//!
//! ```json
//! [{"artist": "Rita MacNeil", "title": "Working Man", "time": "11:45PM"}, ...]
//! ```
//!
//! Other fields on each item are ignored.

use super::{AdapterError, FetchRequest, RawEntry, SourceAdapter};
use serde::Deserialize;
use std::time::Duration;

/// Station tag selecting this adapter
pub const TAG: &str = "leanstream";

const USER_AGENT: &str = concat!("playlog/", env!("CARGO_PKG_VERSION"));

/// Connect timeout; the per-attempt timeout still bounds the whole request
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct HistoryItem {
    artist: String,
    title: String,
    time: String,
}

/// Parse a history response body
pub fn parse_history(body: &[u8]) -> Result<Vec<RawEntry>, String> {
    let items: Vec<HistoryItem> = serde_json::from_slice(body).map_err(|e| e.to_string())?;

    Ok(items
        .into_iter()
        .map(|item| RawEntry {
            artist: item.artist,
            title: item.title,
            local_time: item.time,
        })
        .collect())
}

/// leanStream history client
pub struct LeanStreamAdapter {
    http_client: reqwest::Client,
}

impl LeanStreamAdapter {
    pub fn new() -> Result<Self, AdapterError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AdapterError::Setup(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl SourceAdapter for LeanStreamAdapter {
    fn name(&self) -> &'static str {
        TAG
    }

    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<Vec<RawEntry>, AdapterError> {
        let fetch_error = |message: String| AdapterError::Fetch {
            url: request.url.to_string(),
            message,
        };

        tracing::debug!(url = %request.url, "Requesting leanStream history");

        let response = self
            .http_client
            .get(request.url)
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let entries = parse_history(&body).map_err(|message| AdapterError::Parse {
            url: request.url.to_string(),
            message,
        })?;

        tracing::debug!(url = %request.url, entries = entries.len(), "Parsed leanStream history");

        Ok(entries)
    }
}
