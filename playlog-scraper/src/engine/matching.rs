//! MATCHING state: resume-marker detection and play insertion
//!
//! Entries arrive newest-first. Walking them in that order, the first entry
//! that resolves to the station's last stored play (same song, same
//! timestamp) is where the previous run stopped; everything before it is
//! new. A station with no stored plays takes every entry.

use super::IngestionEngine;
use crate::adapters::RawEntry;
use crate::identity_cache::IdentityCache;
use crate::store::Store;
use playlog_common::db::Station;
use playlog_common::{canonical, time, Result};
use tracing::{debug, instrument, warn};

/// What matching did for one station
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    /// Plays appended
    pub inserted: usize,
    /// Entries dropped (bad time string, blank artist or title)
    pub skipped: usize,
    /// Stopped at the previous run's last play
    pub resumed: bool,
}

impl IngestionEngine {
    #[instrument(skip_all, fields(station = %station.name, entries = entries.len()))]
    pub async fn match_station<S: Store + ?Sized>(
        &self,
        store: &mut S,
        cache: &mut IdentityCache,
        station: &Station,
        entries: Vec<RawEntry>,
    ) -> Result<MatchSummary> {
        let reference = (self.clock)();
        let marker = store.most_recent_play(station.id).await?;
        let mut summary = MatchSummary::default();

        for entry in entries {
            let artist = canonical(&entry.artist);
            let title = canonical(&entry.title);
            if artist.is_empty() || title.is_empty() {
                warn!(artist = %entry.artist, title = %entry.title, "Skipping entry with blank artist or title");
                summary.skipped += 1;
                continue;
            }

            let timestamp = match time::normalize(&entry.local_time, station.utc_offset, reference) {
                Ok(timestamp) => timestamp,
                Err(err) => {
                    warn!(time = %entry.local_time, error = %err, "Skipping entry");
                    summary.skipped += 1;
                    continue;
                }
            };

            let artist_id = cache.resolve_or_insert_artist(store, &artist).await?;
            let song_id = cache.resolve_or_insert_song(store, artist_id, &title).await?;

            if marker.is_some_and(|marker| marker.matches(song_id, timestamp)) {
                debug!(song_id, timestamp, "Reached last recorded play");
                summary.resumed = true;
                break;
            }

            store.insert_play(station.id, song_id, timestamp).await?;
            summary.inserted += 1;
        }

        debug!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            resumed = summary.resumed,
            "Matching done"
        );

        Ok(summary)
    }
}
