//! Command implementations for albumctl CLI

pub mod albums;
pub mod demo;

use std::time::Duration;

use albumctl_core::{await_ready_until, load_dotenv, DbConfig, PgGateway};
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

// Re-export dispatcher functions for flat access from main.rs
pub use albums::{run_add, run_get, run_init, run_list, AddArgs, GetArgs, ListArgs};
pub use demo::{run_demo, DemoArgs};

/// Connection options shared by every database command
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Full connection URL; overrides the DB_* variables
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    pub url: Option<String>,

    /// Seconds between reachability probes
    #[arg(long, value_name = "SECS", default_value = "1", global = true)]
    pub retry_interval: u64,

    /// Give up waiting for the database after this many seconds (default: wait forever)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

/// Open connection handle plus the readiness settings it was created with.
pub struct Session {
    pub gateway: PgGateway,
    pub retry_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Session {
    /// Load .env files, build the descriptor, and open a lazy handle.
    pub fn open(args: &ConnectArgs) -> Result<Self> {
        load_dotenv();

        let descriptor = match &args.url {
            Some(url) => {
                info!("Using connection url from --url/DATABASE_URL");
                url.clone()
            }
            None => {
                let config = DbConfig::from_env().context("invalid DB_* configuration")?;
                info!("Connection url: {}", config.redacted_descriptor());
                config.descriptor()
            }
        };

        let gateway =
            PgGateway::connect(&descriptor).context("failed to open database connection")?;

        Ok(Self {
            gateway,
            retry_interval: Duration::from_secs(args.retry_interval),
            timeout: args.timeout.map(Duration::from_secs),
        })
    }

    /// Poll until the database answers, Ctrl-C or `--timeout` fire.
    pub async fn wait(&self) -> Result<u32> {
        let failures = await_ready_until(&self.gateway, self.retry_interval, self.cancelled())
            .await
            .context("database did not become reachable")?;
        Ok(failures)
    }

    /// Resolves on Ctrl-C or when the configured timeout elapses.
    pub async fn cancelled(&self) {
        let timeout = async {
            match self.timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        let interrupt = async {
            // Without a signal handler only the timeout can cancel
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = timeout => info!("Timed out waiting for database"),
            _ = interrupt => info!("Interrupted while waiting for database"),
        }
    }

    pub async fn close(&self) {
        self.gateway.close().await;
    }
}
