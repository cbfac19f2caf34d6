//! FETCHING state: adapter dispatch and retry

use super::IngestionEngine;
use crate::adapters::{FetchRequest, RawEntry};
use crate::error::StationError;
use playlog_common::db::Station;
use playlog_common::time;
use tracing::{debug, instrument, warn};

impl IngestionEngine {
    /// Download a station's history.
    ///
    /// Network failures are retried immediately until `max_attempts` is
    /// used up. Parse and configuration errors fail on the first attempt.
    /// A station whose UTC offset is unusable fails before any request.
    #[instrument(skip_all, fields(station = %station.name))]
    pub async fn fetch_station(&self, station: &Station) -> Result<Vec<RawEntry>, StationError> {
        time::offset_seconds(station.utc_offset)?;
        let adapter = self.registry.resolve(&station.scraper)?;
        let request = FetchRequest {
            url: &station.url,
            timeout: self.params.timeout,
            headers: &self.params.headers,
        };
        let max_attempts = self.params.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match adapter.fetch(&request).await {
                Ok(entries) => {
                    debug!(adapter = adapter.name(), attempt, entries = entries.len(), "Fetched history");
                    return Ok(entries);
                }
                Err(err) if err.is_retryable() => {
                    warn!(attempt, max_attempts, error = %err, "Fetch attempt failed");
                    if attempt >= max_attempts {
                        return Err(StationError::AttemptsExhausted { attempts: attempt, last: err });
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
