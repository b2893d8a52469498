/// Structured error types for albumctl-core.
///
/// Uses `thiserror` so library consumers can match on the failing step.
/// The binary (albumctl-cli) wraps these in `anyhow` for reporting.
use thiserror::Error;

/// Main error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Environment or descriptor inputs could not be interpreted
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Connection handle could not be created from the descriptor
    #[error("Failed to open connection: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// Reachability probe failed
    #[error("Database not reachable: {source}")]
    Probe {
        #[source]
        source: sqlx::Error,
    },

    /// Readiness polling was cancelled before a probe succeeded
    #[error("Database still unreachable after {attempts} attempts")]
    NotReady { attempts: u32 },

    /// Schema creation failed
    #[error("Failed to create albums table: {source}")]
    Schema {
        #[source]
        source: sqlx::Error,
    },

    /// Insert failed
    #[error("Failed to insert album {title:?} by {artist:?} (score {score}): {source}")]
    Write {
        title: String,
        artist: String,
        score: f64,
        #[source]
        source: sqlx::Error,
    },

    /// No row matched the requested title
    #[error("No album found with title {title:?}")]
    NotFound { title: String },

    /// Query or row decoding failed
    #[error("Failed to read albums for {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Result type alias for albumctl-core operations
pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a read error keyed by the query filter, e.g. `title "Grace"`
    pub fn read(key: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Read {
            key: key.into(),
            source,
        }
    }

    /// Create a not-found error for a title lookup
    pub fn not_found(title: impl Into<String>) -> Self {
        Self::NotFound {
            title: title.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
