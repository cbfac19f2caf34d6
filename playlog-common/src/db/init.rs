//! Database initialization
//!
//! Opens the playlist database and creates the four tables the scraper
//! works with. Table creation is idempotent.

use crate::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

/// Stations provisioned by `setup` unless seeding is disabled.
///
/// (name, url, scraper, utc_offset)
pub const DEFAULT_STATIONS: &[(&str, &str, &str, f64)] = &[
    ("New Country 103.5", "https://player.newcountry1035.com/CKCHFM/history", "leanstream", -4.0),
    ("GIANT 101.9", "https://player.giant1019.com/CHRKFM/history", "leanstream", -4.0),
    ("Cape 94.9", "http://mbsradio.leanplayer.com/CKPEFM/history", "leanstream", -4.0),
    ("cjcb am 1270", "http://mbsradio.leanplayer.com/CJCBAM/history", "leanstream", -4.0),
    ("MAX FM 98.3", "http://mbsradio.leanplayer.com/CHERFM/history", "leanstream", -4.0),
];

/// Open an existing database for a scrape run.
///
/// The file must already exist. A missing database is run-fatal.
pub async fn open_database(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.is_file() {
        return Err(Error::NotFound(format!("Database file '{}'", db_path.display())));
    }

    let db_url = format!("sqlite://{}?mode=rw", db_path.display());
    debug!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect(&db_url)
        .await?;

    create_schema(&pool).await?;
    info!("Opened existing database: {}", db_path.display());

    Ok(pool)
}

/// Create (or open) a database file and make sure all tables exist
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
///
/// One connection only: every `sqlite::memory:` connection is its own
/// database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes if they don't exist
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_stations_table(pool).await?;
    create_artists_table(pool).await?;
    create_songs_table(pool).await?;
    create_playlists_table(pool).await?;
    Ok(())
}

async fn create_stations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stations (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            url TEXT NOT NULL UNIQUE,
            scraper TEXT NOT NULL,
            utc_offset REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY NOT NULL,
            artist_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            UNIQUE(artist_id, title)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_playlists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY NOT NULL,
            station_id INTEGER NOT NULL,
            song_id INTEGER NOT NULL,
            timestamp INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Resume lookups read the newest play per station
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_playlists_station_time ON playlists(station_id, timestamp)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert the default stations, skipping any whose name or URL already exists.
///
/// Returns the number of stations actually inserted.
pub async fn seed_default_stations(pool: &SqlitePool) -> Result<u64> {
    let mut inserted = 0;

    for (name, url, scraper, utc_offset) in DEFAULT_STATIONS {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO stations (name, url, scraper, utc_offset) VALUES (?, ?, ?, ?)",
        )
        .bind(*name)
        .bind(*url)
        .bind(*scraper)
        .bind(*utc_offset)
        .execute(pool)
        .await?;

        inserted += result.rows_affected();
    }

    info!("Seeded {} default stations", inserted);
    Ok(inserted)
}
