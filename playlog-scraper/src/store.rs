//! Persistence interface for one ingestion run
//!
//! A run holds one [`Store`] from start to finish. Every write goes into a
//! single pending transaction; nothing is visible to other readers until
//! [`Store::commit`] succeeds. Dropping the store without committing rolls
//! the whole run back.

use playlog_common::db::{Artist, ArtistId, PlayEvent, ResumeMarker, Song, SongId, Station, StationId};
use playlog_common::{Error, Result};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

#[async_trait::async_trait]
pub trait Store: Send {
    /// All configured stations in id order
    async fn list_stations(&mut self) -> Result<Vec<Station>>;

    async fn list_artists(&mut self) -> Result<Vec<Artist>>;

    async fn list_songs(&mut self) -> Result<Vec<Song>>;

    /// The station's latest play by timestamp, or `None` for a new station
    async fn most_recent_play(&mut self, station_id: StationId) -> Result<Option<ResumeMarker>>;

    /// Insert a canonical artist name, returning the assigned ID
    async fn insert_artist(&mut self, name: &str) -> Result<ArtistId>;

    /// Insert a canonical song title for an artist, returning the assigned ID
    async fn insert_song(&mut self, artist_id: ArtistId, title: &str) -> Result<SongId>;

    async fn insert_play(&mut self, station_id: StationId, song_id: SongId, timestamp: i64) -> Result<()>;

    /// Make every pending write durable. The store accepts no further calls.
    async fn commit(&mut self) -> Result<()>;
}

/// [`Store`] over one SQLite transaction
pub struct SqliteStore {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteStore {
    /// Open the run's transaction
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx: Some(tx) })
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| Error::InvalidInput("Store transaction already committed".to_string()))
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn list_stations(&mut self) -> Result<Vec<Station>> {
        let stations = sqlx::query_as::<_, Station>(
            "SELECT id, name, url, scraper, utc_offset FROM stations ORDER BY id",
        )
        .fetch_all(self.conn()?)
        .await?;

        Ok(stations)
    }

    async fn list_artists(&mut self) -> Result<Vec<Artist>> {
        let artists = sqlx::query_as::<_, Artist>("SELECT id, name FROM artists ORDER BY id")
            .fetch_all(self.conn()?)
            .await?;

        Ok(artists)
    }

    async fn list_songs(&mut self) -> Result<Vec<Song>> {
        let songs = sqlx::query_as::<_, Song>("SELECT id, artist_id, title FROM songs ORDER BY id")
            .fetch_all(self.conn()?)
            .await?;

        Ok(songs)
    }

    async fn most_recent_play(&mut self, station_id: StationId) -> Result<Option<ResumeMarker>> {
        // Equal timestamps: the lowest id was the newest entry of its run
        let play = sqlx::query_as::<_, PlayEvent>(
            r#"
            SELECT id, station_id, song_id, timestamp
            FROM playlists
            WHERE station_id = ?
            ORDER BY timestamp DESC, id ASC
            LIMIT 1
            "#,
        )
        .bind(station_id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(play.as_ref().map(ResumeMarker::from))
    }

    async fn insert_artist(&mut self, name: &str) -> Result<ArtistId> {
        let result = sqlx::query("INSERT INTO artists (name) VALUES (?)")
            .bind(name)
            .execute(self.conn()?)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn insert_song(&mut self, artist_id: ArtistId, title: &str) -> Result<SongId> {
        let result = sqlx::query("INSERT INTO songs (artist_id, title) VALUES (?, ?)")
            .bind(artist_id)
            .bind(title)
            .execute(self.conn()?)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn insert_play(&mut self, station_id: StationId, song_id: SongId, timestamp: i64) -> Result<()> {
        sqlx::query("INSERT INTO playlists (station_id, song_id, timestamp) VALUES (?, ?, ?)")
            .bind(station_id)
            .bind(song_id)
            .bind(timestamp)
            .execute(self.conn()?)
            .await?;

        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| Error::InvalidInput("Store transaction already committed".to_string()))?;
        tx.commit().await?;
        Ok(())
    }
}
