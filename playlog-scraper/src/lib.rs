//! playlog-scraper library
//!
//! Incremental "now playing" ingestion: fetch each station's recent history,
//! date it, and append only the plays not already recorded.

pub mod adapters;
pub mod backup;
pub mod engine;
pub mod error;
pub mod headers;
pub mod identity_cache;
pub mod store;

pub use adapters::{AdapterError, AdapterRegistry, FetchRequest, RawEntry, SourceAdapter};
pub use engine::{IngestionEngine, MatchSummary, RunParams, RunReport, StationOutcome, StationReport};
pub use error::StationError;
pub use identity_cache::IdentityCache;
pub use store::{SqliteStore, Store};
