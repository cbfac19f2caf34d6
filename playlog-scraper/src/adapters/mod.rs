//! Playlist source adapters
//!
//! Each vendor's "recently played" endpoint gets one [`SourceAdapter`]
//! implementation. Stations name their adapter with a tag (the `scraper`
//! column); [`AdapterRegistry`] maps tags to adapter instances.
//!
//! # Example
//! ```rust,ignore
//! use playlog_scraper::adapters::{AdapterError, FetchRequest, RawEntry, SourceAdapter};
//!
//! pub struct StaticAdapter(Vec<RawEntry>);
//!
//! #[async_trait::async_trait]
//! impl SourceAdapter for StaticAdapter {
//!     fn name(&self) -> &'static str { "static" }
//!
//!     async fn fetch(&self, _request: &FetchRequest<'_>) -> Result<Vec<RawEntry>, AdapterError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

pub mod leanstream;

use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use leanstream::LeanStreamAdapter;

/// One playlist line as the station reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub artist: String,
    pub title: String,
    /// Station-local time of day, e.g. "11:45PM"
    pub local_time: String,
}

impl RawEntry {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, local_time: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            local_time: local_time.into(),
        }
    }
}

/// Everything an adapter needs for one download attempt
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub url: &'a str,
    /// Upper bound for this attempt, connection through body
    pub timeout: Duration,
    pub headers: &'a HeaderMap,
}

/// Adapter errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Network, timeout or HTTP status failure. Retryable.
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Response arrived but is not in the expected structure
    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    /// No adapter registered for the station's tag
    #[error("Unsupported adapter '{0}'")]
    UnsupportedAdapter(String),

    /// Adapter could not be constructed
    #[error("Adapter setup failed: {0}")]
    Setup(String),
}

impl AdapterError {
    /// Only network-level failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdapterError::Fetch { .. })
    }
}

/// Capability contract for a vendor's playlist history endpoint
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Adapter name for logging
    fn name(&self) -> &'static str;

    /// Download and parse the station's history.
    ///
    /// # Returns
    /// Entries newest-first, exactly as the station reports them. An empty
    /// history is `Ok(vec![])`, not an error.
    ///
    /// # Errors
    /// `Fetch` for transport failures, `Parse` for unexpected bodies.
    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<Vec<RawEntry>, AdapterError>;
}

/// Tag → adapter lookup
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter (`leanstream`)
    pub fn with_defaults() -> Result<Self, AdapterError> {
        let mut registry = Self::new();
        registry.register(leanstream::TAG, Arc::new(LeanStreamAdapter::new()?));
        Ok(registry)
    }

    /// Register (or replace) the adapter for `tag`
    pub fn register(&mut self, tag: &str, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(normalize_tag(tag), adapter);
    }

    /// Adapter for a station's tag.
    ///
    /// Tags compare case-insensitively, ignoring surrounding whitespace.
    pub fn resolve(&self, tag: &str) -> Result<Arc<dyn SourceAdapter>, AdapterError> {
        self.adapters
            .get(&normalize_tag(tag))
            .cloned()
            .ok_or_else(|| AdapterError::UnsupportedAdapter(tag.to_string()))
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.adapters.keys().cloned().collect();
        tags.sort();
        tags
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}
