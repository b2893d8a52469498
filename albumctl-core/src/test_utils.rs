/// In-memory `AlbumStore` for unit tests.
///
/// Mirrors the table's behaviour closely enough for the walkthrough and
/// readiness loop: ids are assigned on insert, the score CHECK constraint is
/// enforced, and lookups are exact matches.
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::album::Album;
use crate::error::{GatewayError, Result};
use crate::gateway::AlbumStore;

#[derive(Debug, Default)]
pub struct FakeStore {
    albums: Mutex<Vec<Album>>,
    failing_pings: AtomicU32,
    pings: AtomicU32,
    schema_calls: AtomicU32,
    fail_schema: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose first `n` probes fail.
    pub fn unreachable_for(n: u32) -> Self {
        let store = Self::default();
        store.failing_pings.store(n, Ordering::SeqCst);
        store
    }

    pub fn with_schema_failure(self) -> Self {
        self.fail_schema.store(true, Ordering::SeqCst);
        self
    }

    pub fn pings(&self) -> u32 {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn schema_calls(&self) -> u32 {
        self.schema_calls.load(Ordering::SeqCst)
    }

    pub fn albums(&self) -> Vec<Album> {
        self.albums.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlbumStore for FakeStore {
    async fn ping(&self) -> Result<()> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_pings.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_pings.store(remaining - 1, Ordering::SeqCst);
            return Err(GatewayError::Probe {
                source: sqlx::Error::PoolTimedOut,
            });
        }
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_schema.load(Ordering::SeqCst) {
            return Err(GatewayError::Schema {
                source: sqlx::Error::Protocol("permission denied for schema public".into()),
            });
        }
        Ok(())
    }

    async fn insert(&self, album: &Album) -> Result<()> {
        if !(0.0..=10.0).contains(&album.score) {
            return Err(GatewayError::Write {
                title: album.title.clone(),
                artist: album.artist.clone(),
                score: album.score,
                source: sqlx::Error::Protocol("violates check constraint \"albums_score_check\"".into()),
            });
        }
        let mut albums = self.albums.lock().unwrap();
        let id = albums.len() as i64 + 1;
        albums.push(Album {
            id: Some(id),
            ..album.clone()
        });
        Ok(())
    }

    async fn find_one(&self, title: &str) -> Result<Album> {
        self.albums
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.title == title)
            .cloned()
            .ok_or_else(|| GatewayError::not_found(title))
    }

    async fn find_many(&self, artist: &str) -> Result<Vec<Album>> {
        Ok(self
            .albums
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.artist == artist)
            .cloned()
            .collect())
    }
}
