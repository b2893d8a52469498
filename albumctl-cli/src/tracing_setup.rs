//! Tracing setup for the albumctl CLI
//!
//! Usage:
//!   albumctl --debug ...                # Debug logging to console
//!   RUST_LOG=albumctl_core=debug albumctl  # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                            # Log filter (default: info)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
}

impl TracingConfig {
    fn default_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Initialize console tracing on stderr. RUST_LOG takes precedence over `--debug`.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr) // stdout is reserved for --json output
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_selects_filter() {
        assert_eq!(TracingConfig { debug: true }.default_filter(), "debug");
        assert_eq!(TracingConfig::default().default_filter(), "info");
    }

    #[test]
    fn second_init_reports_error() {
        let _ = init(&TracingConfig::default());
        assert!(init(&TracingConfig::default()).is_err());
    }
}
