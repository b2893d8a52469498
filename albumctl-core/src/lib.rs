pub mod album;
pub mod config;
pub mod error;
pub mod gateway;
pub mod readiness;
pub mod walkthrough;

#[cfg(test)]
mod test_utils;

pub use album::{sample_albums, Album};
pub use config::{load_dotenv, DbConfig};
pub use error::{GatewayError, Result};
pub use gateway::{AlbumStore, PgGateway};
pub use readiness::{await_ready, await_ready_for, await_ready_until, DEFAULT_RETRY_INTERVAL};
pub use walkthrough::{Walkthrough, WalkthroughReport};
