//! Scripted end-to-end run: wait, create table, insert, query
//!
//! Only a failed connection stops the process, and that happens before this
//! runs. Every error here is logged and the next step proceeds.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use crate::album::{sample_albums, Album};
use crate::error::Result;
use crate::gateway::AlbumStore;
use crate::readiness::{await_ready_until, DEFAULT_RETRY_INTERVAL};

#[derive(Debug, Clone)]
pub struct Walkthrough {
    pub retry_interval: Duration,
    pub albums: Vec<Album>,
    /// Title looked up with `find_one`
    pub title: String,
    /// Artist listed with `find_many`
    pub artist: String,
}

impl Default for Walkthrough {
    fn default() -> Self {
        Self {
            retry_interval: DEFAULT_RETRY_INTERVAL,
            albums: sample_albums(),
            title: "Grace".to_string(),
            artist: "Radiohead".to_string(),
        }
    }
}

/// What each step produced.
#[derive(Debug, Default, Serialize)]
pub struct WalkthroughReport {
    pub probe_failures: u32,
    pub schema_ready: bool,
    pub inserted: usize,
    pub failed_inserts: usize,
    pub found: Option<Album>,
    pub by_artist: Vec<Album>,
    pub errors: Vec<String>,
}

impl Walkthrough {
    /// Wait for the database indefinitely, then run every step.
    pub async fn run<S>(&self, store: &S) -> WalkthroughReport
    where
        S: AlbumStore + ?Sized,
    {
        match self.run_until(store, std::future::pending::<()>()).await {
            Ok(report) => report,
            Err(_) => unreachable!("pending cancel future never resolves"),
        }
    }

    /// Like [`run`](Self::run), but returns `NotReady` if `cancel` resolves
    /// before the database answers. Once ready, the steps always complete.
    pub async fn run_until<S, F>(&self, store: &S, cancel: F) -> Result<WalkthroughReport>
    where
        S: AlbumStore + ?Sized,
        F: Future<Output = ()>,
    {
        let mut report = WalkthroughReport {
            probe_failures: await_ready_until(store, self.retry_interval, cancel).await?,
            ..Default::default()
        };

        match store.ensure_schema().await {
            Ok(()) => {
                info!("albums table ready");
                report.schema_ready = true;
            }
            Err(err) => {
                // Later steps run against whatever schema exists
                error!(error = %err, "schema creation failed");
                report.errors.push(err.to_string());
            }
        }

        for album in &self.albums {
            match store.insert(album).await {
                Ok(()) => {
                    info!(title = %album.title, artist = %album.artist, score = album.score, "inserted album");
                    report.inserted += 1;
                }
                Err(err) => {
                    error!(error = %err, "insert failed");
                    report.failed_inserts += 1;
                    report.errors.push(err.to_string());
                }
            }
        }

        match store.find_one(&self.title).await {
            Ok(album) => {
                info!(?album, "found album by title");
                report.found = Some(album);
            }
            Err(err) => {
                error!(error = %err, not_found = err.is_not_found(), "lookup by title failed");
                report.errors.push(err.to_string());
            }
        }

        match store.find_many(&self.artist).await {
            Ok(albums) => {
                info!(artist = %self.artist, count = albums.len(), "listed albums by artist");
                for album in &albums {
                    info!(?album, "album");
                }
                report.by_artist = albums;
            }
            Err(err) => {
                error!(error = %err, "lookup by artist failed");
                report.errors.push(err.to_string());
            }
        }

        Ok(report)
    }
}
