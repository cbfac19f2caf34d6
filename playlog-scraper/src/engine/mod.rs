//! Incremental ingestion engine
//!
//! One run walks every configured station:
//!
//! ```text
//! begin ─► load stations, artists, songs ─► build IdentityCache
//!       ─► FETCHING (all stations, optionally concurrent)
//!       ─► MATCHING (one station at a time, configured order)
//!       ─► commit
//! ```
//!
//! Per station the states are FETCHING → MATCHING → DONE, or FAILED from
//! FETCHING. A failed station never affects the others. A store error
//! anywhere aborts the run before commit.

mod fetch;
mod matching;
mod report;

pub use matching::MatchSummary;
pub use report::{RunReport, StationOutcome, StationReport};

use crate::adapters::{AdapterRegistry, RawEntry};
use crate::error::StationError;
use crate::identity_cache::IdentityCache;
use crate::store::Store;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use playlog_common::config::{DEFAULT_CONNECTION_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use playlog_common::db::Station;
use playlog_common::Result;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{info, instrument};

/// Source of the reference instant used to date playlist entries
pub type Clock = fn() -> DateTime<Utc>;

/// Parameters shared by every station in a run
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Download attempts per station, at least one
    pub max_attempts: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Sent with every playlist request
    pub headers: HeaderMap,
    /// Fetch all stations concurrently before matching
    pub parallel_fetch: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CONNECTION_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            headers: HeaderMap::new(),
            parallel_fetch: true,
        }
    }
}

pub struct IngestionEngine {
    registry: AdapterRegistry,
    params: RunParams,
    clock: Clock,
}

impl IngestionEngine {
    pub fn new(registry: AdapterRegistry, params: RunParams) -> Self {
        Self {
            registry,
            params,
            clock: playlog_common::time::now,
        }
    }

    /// Replace the wall clock, e.g. with a fixed instant in tests
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    /// Fetch and match a single station.
    ///
    /// Station-level failures come back as [`StationOutcome::Failed`]; only
    /// store errors are returned as `Err`.
    pub async fn scrape_station<S: Store + ?Sized>(
        &self,
        store: &mut S,
        cache: &mut IdentityCache,
        station: &Station,
    ) -> Result<StationOutcome> {
        let fetched = self.fetch_station(station).await;
        self.finish_station(store, cache, station, fetched).await
    }

    /// Ingest every configured station and commit once.
    #[instrument(skip_all)]
    pub async fn run<S: Store + ?Sized>(&self, store: &mut S) -> Result<RunReport> {
        let stations = store.list_stations().await?;
        let artists = store.list_artists().await?;
        let songs = store.list_songs().await?;
        let mut cache = IdentityCache::from_rows(&artists, &songs);

        info!(
            stations = stations.len(),
            artists = cache.artist_count(),
            songs = cache.song_count(),
            "Starting run"
        );

        let fetched = self.fetch_all(&stations).await;

        let mut reports = Vec::with_capacity(stations.len());
        for (station, fetched) in stations.iter().zip(fetched) {
            let outcome = self.finish_station(store, &mut cache, station, fetched).await?;
            reports.push(StationReport {
                station_id: station.id,
                station_name: station.name.clone(),
                outcome,
            });
        }

        store.commit().await?;

        let report = RunReport { stations: reports };
        report.log_summary();
        Ok(report)
    }

    /// Results come back in station order regardless of completion order
    async fn fetch_all(&self, stations: &[Station]) -> Vec<std::result::Result<Vec<RawEntry>, StationError>> {
        if self.params.parallel_fetch {
            return join_all(stations.iter().map(|station| self.fetch_station(station))).await;
        }

        let mut fetched = Vec::with_capacity(stations.len());
        for station in stations {
            fetched.push(self.fetch_station(station).await);
        }
        fetched
    }

    async fn finish_station<S: Store + ?Sized>(
        &self,
        store: &mut S,
        cache: &mut IdentityCache,
        station: &Station,
        fetched: std::result::Result<Vec<RawEntry>, StationError>,
    ) -> Result<StationOutcome> {
        match fetched {
            Ok(entries) => {
                let summary = self.match_station(store, cache, station, entries).await?;
                Ok(StationOutcome::Done(summary))
            }
            Err(err) => {
                tracing::error!(station = %station.name, error = %err, "Station failed");
                Ok(StationOutcome::Failed(err))
            }
        }
    }
}
