//! HTTP headers file
//!
//! Some players refuse requests without a browser-like `User-Agent` or a
//! `Referer`. Operators list extra headers in a JSON object:
//!
//! ```json
//! { "User-Agent": "Mozilla/5.0", "Referer": "https://player.example.com/" }
//! ```
//!
//! The file is optional. Any problem with it is logged and the run goes on
//! with whatever headers could be read.

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::Path;
use tracing::{debug, warn};

/// Load headers, falling back to an empty map on any error
pub fn load_headers(path: &Path) -> HeaderMap {
    match read_headers(path) {
        Ok(headers) => {
            debug!(path = %path.display(), count = headers.len(), "Loaded request headers");
            headers
        }
        Err(err) => {
            warn!(path = %path.display(), "Using no extra request headers: {:#}", err);
            HeaderMap::new()
        }
    }
}

fn read_headers(path: &Path) -> Result<HeaderMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let serde_json::Value::Object(entries) = value else {
        bail!("{} is not a JSON object", path.display());
    };

    let mut headers = HeaderMap::with_capacity(entries.len());
    for (name, value) in entries {
        match header_pair(&name, &value) {
            Ok((name, value)) => {
                headers.insert(name, value);
            }
            Err(err) => warn!(header = %name, "Ignoring header: {:#}", err),
        }
    }

    Ok(headers)
}

fn header_pair(name: &str, value: &serde_json::Value) -> Result<(HeaderName, HeaderValue)> {
    let Some(value) = value.as_str() else {
        bail!("value is not a string");
    };

    let name = HeaderName::from_bytes(name.as_bytes()).context("invalid header name")?;
    let value = HeaderValue::from_str(value).context("invalid header value")?;
    Ok((name, value))
}
