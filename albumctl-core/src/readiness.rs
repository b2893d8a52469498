//! Poll the database until it answers a probe
//!
//! Fixed interval, no backoff growth, no retry cap. The `_until` and `_for`
//! variants add a way out for callers that cannot block forever.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{GatewayError, Result};
use crate::gateway::AlbumStore;

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Block until a probe succeeds. Returns the number of failed probes.
pub async fn await_ready<S>(store: &S, interval: Duration) -> u32
where
    S: AlbumStore + ?Sized,
{
    match await_ready_until(store, interval, std::future::pending::<()>()).await {
        Ok(failures) => failures,
        Err(_) => unreachable!("pending cancel future never resolves"),
    }
}

/// Like [`await_ready`], but gives up once `timeout` has elapsed.
pub async fn await_ready_for<S>(store: &S, interval: Duration, timeout: Duration) -> Result<u32>
where
    S: AlbumStore + ?Sized,
{
    await_ready_until(store, interval, tokio::time::sleep(timeout)).await
}

/// Like [`await_ready`], but stops with [`GatewayError::NotReady`] as soon
/// as `cancel` resolves, whether mid-probe or mid-sleep.
pub async fn await_ready_until<S, F>(store: &S, interval: Duration, cancel: F) -> Result<u32>
where
    S: AlbumStore + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let mut failures: u32 = 0;

    loop {
        let probe = tokio::select! {
            biased;
            _ = &mut cancel => return Err(GatewayError::NotReady { attempts: failures }),
            probe = store.ping() => probe,
        };

        match probe {
            Ok(()) => {
                info!(retries = failures, "Connected to database");
                return Ok(failures);
            }
            Err(err) => {
                failures += 1;
                warn!(attempt = failures, error = %err, "Waiting for database, retrying in {:?}", interval);
            }
        }

        tokio::select! {
            biased;
            _ = &mut cancel => return Err(GatewayError::NotReady { attempts: failures }),
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
