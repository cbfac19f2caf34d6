//! Artist and song identity cache
//!
//! Maps canonical artist names to artist IDs and, per artist, canonical song
//! titles to song IDs. Built once per run from a full scan of the store.
//!
//! The cache is write-through: a miss in `resolve_or_insert_*` inserts the
//! row into the store first and only then records the store-assigned ID, so
//! the cache never holds an ID the pending transaction doesn't.

use crate::store::Store;
use playlog_common::db::{Artist, ArtistId, Song, SongId};
use playlog_common::{canonical, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    artists: HashMap<String, ArtistId>,
    songs: HashMap<ArtistId, HashMap<String, SongId>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate from stored rows.
    ///
    /// Names are canonicalized on the way in. If legacy rows collapse to the
    /// same canonical key the first row wins.
    pub fn from_rows(artists: &[Artist], songs: &[Song]) -> Self {
        let mut cache = Self::new();

        for artist in artists {
            cache.insert_artist(&artist.name, artist.id);
        }
        for song in songs {
            cache.insert_song(song.artist_id, &song.title, song.id);
        }

        cache
    }

    pub fn resolve_artist(&self, name: &str) -> Option<ArtistId> {
        self.artists.get(&canonical(name)).copied()
    }

    pub fn resolve_song(&self, artist_id: ArtistId, title: &str) -> Option<SongId> {
        self.songs
            .get(&artist_id)
            .and_then(|titles| titles.get(&canonical(title)))
            .copied()
    }

    /// Record a store-assigned artist ID.
    ///
    /// Returns the ID now mapped to the name. An existing mapping is never
    /// replaced, so the result differs from `id` only on a conflict.
    pub fn insert_artist(&mut self, name: &str, id: ArtistId) -> ArtistId {
        let mapped = *self.artists.entry(canonical(name)).or_insert(id);
        self.songs.entry(mapped).or_default();
        mapped
    }

    /// Record a store-assigned song ID; same conflict rule as `insert_artist`
    pub fn insert_song(&mut self, artist_id: ArtistId, title: &str, id: SongId) -> SongId {
        *self
            .songs
            .entry(artist_id)
            .or_default()
            .entry(canonical(title))
            .or_insert(id)
    }

    /// Look up an artist, inserting it into the store and cache on a miss
    pub async fn resolve_or_insert_artist<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<ArtistId> {
        let name = canonical(name);
        if let Some(id) = self.artists.get(&name) {
            return Ok(*id);
        }

        let id = store.insert_artist(&name).await?;
        tracing::debug!(artist = %name, artist_id = id, "New artist");
        Ok(self.insert_artist(&name, id))
    }

    /// Look up a song of a known artist, inserting it on a miss
    pub async fn resolve_or_insert_song<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        artist_id: ArtistId,
        title: &str,
    ) -> Result<SongId> {
        let title = canonical(title);
        if let Some(id) = self.songs.get(&artist_id).and_then(|titles| titles.get(&title)) {
            return Ok(*id);
        }

        let id = store.insert_song(artist_id, &title).await?;
        tracing::debug!(title = %title, artist_id, song_id = id, "New song");
        Ok(self.insert_song(artist_id, &title, id))
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn song_count(&self) -> usize {
        self.songs.values().map(HashMap::len).sum()
    }
}
