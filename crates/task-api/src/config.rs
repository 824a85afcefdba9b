//! Configuration for the task API service.

use std::env;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3303;

/// Default store connection target.
pub const DEFAULT_STORE_URI: &str = "memory://";

/// Task API service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Store connection target (`memory://`, `file://<path>` or a path).
    pub store_uri: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            store_uri: lookup("STORE_URI")
                .or_else(|| lookup("MONGODB_URI"))
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORE_URI.to_string()),
            json_logs: lookup("LOG_FORMAT")
                .is_some_and(|v| v.eq_ignore_ascii_case("json")),
        }
    }

    /// Socket address to bind.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
