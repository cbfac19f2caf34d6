//! Database Test Utilities

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use playlog_common::db::{init_memory_database, StationId};
use sqlx::SqlitePool;

/// Reference instant for engine tests: 2024-03-09 18:00 UTC (14:00 at UTC-4)
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 18, 0, 0).unwrap()
}

/// Epoch seconds for a UTC wall time on the fixed test date
pub fn utc_ts(day: u32, hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap().timestamp()
}

/// In-memory database with the schema applied and no stations
pub async fn create_test_db() -> Result<SqlitePool> {
    Ok(init_memory_database().await?)
}

pub async fn insert_station(pool: &SqlitePool, name: &str, url: &str, scraper: &str, utc_offset: f64) -> Result<StationId> {
    let result = sqlx::query("INSERT INTO stations (name, url, scraper, utc_offset) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(url)
        .bind(scraper)
        .bind(utc_offset)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64> {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    Ok(sqlx::query_scalar(&query).fetch_one(pool).await?)
}

/// A stored play with its identities resolved to text
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayRow {
    pub station_id: i64,
    pub artist: String,
    pub title: String,
    pub timestamp: i64,
}

/// All plays in insertion order
pub async fn plays(pool: &SqlitePool) -> Result<Vec<PlayRow>> {
    let rows = sqlx::query_as::<_, PlayRow>(
        r#"
        SELECT p.station_id, a.name AS artist, s.title, p.timestamp
        FROM playlists p
        JOIN songs s ON s.id = p.song_id
        JOIN artists a ON a.id = s.artist_id
        ORDER BY p.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
