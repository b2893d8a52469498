//! Database gateway for the `albums` table
//!
//! `AlbumStore` is the seam the walkthrough and readiness loop are written
//! against; `PgGateway` is the PostgreSQL implementation on a sqlx pool.
//!
//! - connect is lazy: no round trip until the first probe or query
//! - score range is left to the table's CHECK constraint
//! - queries name their columns instead of relying on `SELECT *` order

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};
use tracing::debug;

use crate::album::Album;
use crate::error::{GatewayError, Result};

/// Single caller, so a small pool is plenty.
const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// Upper bound on a single pool acquire for queries.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on one probe against a host that never answers.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const CREATE_ALBUMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS albums (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        score DOUBLE PRECISION NOT NULL CHECK (score >= 0 AND score <= 10)
    )
"#;

const INSERT_ALBUM: &str = "INSERT INTO albums (title, artist, score) VALUES ($1, $2, $3)";

const SELECT_BY_TITLE: &str = "SELECT id, title, artist, score FROM albums WHERE title = $1";

const SELECT_BY_ARTIST: &str = "SELECT id, title, artist, score FROM albums WHERE artist = $1";

/// Operations the walkthrough needs from a database.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// Lightweight reachability check; transfers no data.
    async fn ping(&self) -> Result<()>;

    /// Create the albums table if it does not exist. Idempotent.
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert one album. The generated id is not returned.
    async fn insert(&self, album: &Album) -> Result<()>;

    /// First album whose title matches exactly.
    ///
    /// Titles are not unique; with several matches, which row comes back
    /// is up to the database.
    async fn find_one(&self, title: &str) -> Result<Album>;

    /// Every album whose artist matches exactly.
    async fn find_many(&self, artist: &str) -> Result<Vec<Album>>;
}

/// PostgreSQL-backed [`AlbumStore`].
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    /// Open a lazily validated handle from a `postgres://` descriptor.
    ///
    /// Only parsing happens here; an unreachable server is reported by the
    /// first [`ping`](AlbumStore::ping), not by this call.
    pub fn connect(descriptor: &str) -> Result<Self> {
        let options = PgConnectOptions::from_str(descriptor)
            .map_err(|source| GatewayError::Connection { source })?;

        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection. Called once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl AlbumStore for PgGateway {
    /// Opens a dedicated connection outside the pool, so a refused or
    /// unresolvable server fails at once with the driver's own error
    /// instead of a pool acquire timeout.
    async fn ping(&self) -> Result<()> {
        let options = self.pool.connect_options();
        let probe = async {
            let mut conn = PgConnection::connect_with(&*options).await?;
            conn.ping().await?;
            conn.close().await
        };

        match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
            Ok(outcome) => outcome.map_err(|source| GatewayError::Probe { source }),
            Err(_) => Err(GatewayError::Probe {
                source: sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("no answer within {:?}", PROBE_TIMEOUT),
                )),
            }),
        }
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_ALBUMS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|source| GatewayError::Schema { source })?;
        debug!("albums table ready");
        Ok(())
    }

    async fn insert(&self, album: &Album) -> Result<()> {
        sqlx::query(INSERT_ALBUM)
            .bind(&album.title)
            .bind(&album.artist)
            .bind(album.score)
            .execute(&self.pool)
            .await
            .map_err(|source| GatewayError::Write {
                title: album.title.clone(),
                artist: album.artist.clone(),
                score: album.score,
                source,
            })?;
        debug!(title = %album.title, artist = %album.artist, "inserted album");
        Ok(())
    }

    async fn find_one(&self, title: &str) -> Result<Album> {
        sqlx::query_as::<_, Album>(SELECT_BY_TITLE)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| GatewayError::read(format!("title {:?}", title), source))?
            .ok_or_else(|| GatewayError::not_found(title))
    }

    async fn find_many(&self, artist: &str) -> Result<Vec<Album>> {
        let mut rows = sqlx::query_as::<_, Album>(SELECT_BY_ARTIST)
            .bind(artist)
            .fetch(&self.pool);

        // A cursor error discards whatever was accumulated so far.
        let mut albums = Vec::new();
        while let Some(album) = rows
            .try_next()
            .await
            .map_err(|source| GatewayError::read(format!("artist {:?}", artist), source))?
        {
            albums.push(album);
        }

        Ok(albums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_descriptor_is_connection_error() {
        let err = PgGateway::connect("not a descriptor").unwrap_err();
        assert!(matches!(err, GatewayError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_connect_does_not_touch_network() {
        // Port 1 is never a Postgres server; lazy open must still succeed.
        let gateway = PgGateway::connect("postgres://user:pw@127.0.0.1:1/albums").unwrap();
        assert_eq!(gateway.pool().size(), 0);
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_refused_ping_fails_fast_with_driver_error() {
        let gateway = PgGateway::connect("postgres://user:pw@127.0.0.1:1/albums").unwrap();
        let start = std::time::Instant::now();

        let err = gateway.ping().await.unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(1), "took {:?}", start.elapsed());
        match err {
            GatewayError::Probe { source } => {
                assert!(!matches!(source, sqlx::Error::PoolTimedOut), "got {source:?}");
                assert!(matches!(source, sqlx::Error::Io(_)), "got {source:?}");
            }
            other => panic!("expected Probe, got {other:?}"),
        }
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_driver_errors_on_lookup_are_read_errors() {
        let gateway = PgGateway::connect("postgres://user:pw@127.0.0.1:1/albums").unwrap();
        gateway.close().await;

        match gateway.find_one("Grace").await.unwrap_err() {
            GatewayError::Read { key, .. } => assert!(key.contains("Grace"), "key {key}"),
            other => panic!("expected Read, got {other:?}"),
        }
        match gateway.find_many("Radiohead").await.unwrap_err() {
            GatewayError::Read { key, .. } => assert!(key.contains("Radiohead"), "key {key}"),
            other => panic!("expected Read, got {other:?}"),
        }
    }

    #[test]
    fn test_queries_select_explicit_columns() {
        for sql in [SELECT_BY_TITLE, SELECT_BY_ARTIST] {
            assert!(sql.starts_with("SELECT id, title, artist, score FROM albums"));
        }
    }
}
