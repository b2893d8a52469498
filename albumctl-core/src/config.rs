use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{GatewayError, Result};

pub const DEFAULT_PORT: u16 = 5432;

/// Environment variable names read by [`DbConfig::from_env`]
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASSWORD: &str = "DB_PASSWD";
pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_PORT: &str = "DB_PORT";
pub const ENV_NAME: &str = "DB_NAME";

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the process environment
/// 2. Current directory .env
/// 3. ~/.albumctl/.env
///
/// dotenvy never overwrites variables that are already set, so loading
/// the current directory first gives it precedence over the home file.
/// A missing file is not an error. Returns the files that were loaded.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("Loaded .env from current directory: {}", path.display());
            loaded_from.push(path);
        }
        Err(e) => debug!("No .env in current directory: {}", e),
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from ~/.albumctl: {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        info!("No .env file found, using environment variables only");
    } else {
        let names: Vec<String> = loaded_from.iter().map(|p| p.display().to_string()).collect();
        info!("Loaded configuration from: {}", names.join(", "));
    }

    loaded_from
}

/// Get the albumctl config directory path (~/.albumctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".albumctl"))
}

/// Connection settings assembled from `DB_*` variables.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl DbConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup, so callers can supply
    /// values without touching the process environment.
    ///
    /// Missing values become empty strings; a missing or blank port falls
    /// back to [`DEFAULT_PORT`]. A port that is present but not a valid
    /// `u16` is rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();

        let port = match lookup(ENV_PORT).map(|p| p.trim().to_string()) {
            None => DEFAULT_PORT,
            Some(p) if p.is_empty() => DEFAULT_PORT,
            Some(p) => p.parse::<u16>().map_err(|e| {
                GatewayError::config(format!("{} must be a port number, got {:?}: {}", ENV_PORT, p, e))
            })?,
        };

        Ok(Self {
            user: get(ENV_USER),
            password: get(ENV_PASSWORD),
            host: get(ENV_HOST),
            port,
            name: get(ENV_NAME),
        })
    }

    /// Render `postgres://{user}:{password}@{host}:{port}/{dbname}`.
    ///
    /// User and password are percent-encoded so `@`, `:` and `/` inside
    /// credentials cannot split the descriptor.
    pub fn descriptor(&self) -> String {
        self.render(&urlencoding::encode(&self.password))
    }

    /// Same as [`descriptor`](Self::descriptor) with the password masked.
    pub fn redacted_descriptor(&self) -> String {
        if self.password.is_empty() {
            self.render("")
        } else {
            self.render("****")
        }
    }

    fn render(&self, password: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            password,
            self.host,
            self.port,
            self.name
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"****")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}
