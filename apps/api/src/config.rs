//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! `main` loads a `.env` file first (if present) so local overrides work
//! without exporting anything.
//!
//! | Env Var                  | Default                 |
//! |--------------------------|-------------------------|
//! | `LEDGER_HOST`            | `127.0.0.1`             |
//! | `LEDGER_PORT`            | `8000`                  |
//! | `LEDGER_DATABASE_PATH`   | `./ledger.db`           |
//! | `LEDGER_MAX_CONNECTIONS` | `5`                     |
//! | `LEDGER_CONNECT_TIMEOUT` | `30` (seconds)          |
//! | `LEDGER_CORS_ORIGINS`    | `http://localhost:5173` |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address
    pub host: IpAddr,

    /// Bind port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long a request waits for a pooled connection
    pub connect_timeout: Duration,

    /// Allowed frontend origins, comma-separated in the environment
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            host: var("LEDGER_HOST", "127.0.0.1")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_HOST".to_string()))?,

            port: var("LEDGER_PORT", "8000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_PORT".to_string()))?,

            database_path: PathBuf::from(var("LEDGER_DATABASE_PATH", "./ledger.db")),

            max_connections: var("LEDGER_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_MAX_CONNECTIONS".to_string()))?,

            connect_timeout: var("LEDGER_CONNECT_TIMEOUT", "30")
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue("LEDGER_CONNECT_TIMEOUT".to_string()))?,

            cors_origins: var("LEDGER_CORS_ORIGINS", "http://localhost:5173")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("LEDGER_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
