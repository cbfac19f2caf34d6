//! Database models

use serde::{Deserialize, Serialize};

pub type StationId = i64;
pub type ArtistId = i64;
pub type SongId = i64;

/// A configured playlist source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub url: String,
    /// Adapter discriminator, e.g. "leanstream"
    pub scraper: String,
    /// Signed UTC offset in hours, may be fractional
    pub utc_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub id: ArtistId,
    /// Canonical form
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    pub id: SongId,
    pub artist_id: ArtistId,
    /// Canonical form
    pub title: String,
}

/// One recorded airing of a song on a station (row of `playlists`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayEvent {
    pub id: i64,
    pub station_id: StationId,
    pub song_id: SongId,
    /// UTC epoch seconds
    pub timestamp: i64,
}

/// Where the previous run for a station stopped: its most recent play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeMarker {
    pub song_id: SongId,
    pub timestamp: i64,
}

impl From<&PlayEvent> for ResumeMarker {
    fn from(play: &PlayEvent) -> Self {
        Self {
            song_id: play.song_id,
            timestamp: play.timestamp,
        }
    }
}

impl ResumeMarker {
    /// True when a fetched entry resolves to the last recorded play
    pub fn matches(&self, song_id: SongId, timestamp: i64) -> bool {
        self.song_id == song_id && self.timestamp == timestamp
    }
}
