//! Application configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Where documents are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be \"sqlite\" or \"memory\", got {:?}", other),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,

    /// Storage backend: "sqlite" or "memory"
    pub store_backend: StoreBackend,
    /// SQLite database path (if using sqlite backend)
    pub store_db: String,

    /// Directory the front-end bundle is served from
    pub static_dir: String,

    /// CORS allowed origins (comma-separated, or "*" for any); empty disables CORS
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: var("SERVER_PORT", "3000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            store_backend: var("STORE_BACKEND", "sqlite").parse()?,
            store_db: var("STORE_DB", "sheetkeeper.db"),

            static_dir: var("STATIC_DIR", "public"),

            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}
