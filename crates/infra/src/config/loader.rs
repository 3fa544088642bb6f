//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from a TOML file
//!
//! ## Environment Variables
//! - `BOOKLINE_DB_PATH`: SQLite database file path
//! - `BOOKLINE_DB_POOL_SIZE`: Connection pool size (optional, default 4)
//! - `BOOKLINE_GOOGLE_CLIENT_ID`: Google OAuth client id
//! - `BOOKLINE_GOOGLE_CLIENT_SECRET`: Google OAuth client secret
//! - `BOOKLINE_BIND_ADDR`: Webhook bind address (optional, default
//!   `127.0.0.1:8080`)

use std::path::Path;

use bookline_domain::{
    BooklineError, Config, DatabaseConfig, GoogleApiConfig, Result, ServerConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading `bookline.toml` from the
/// working directory.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment configuration incomplete, trying file");
            load_from_file(Path::new("bookline.toml"))
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `BooklineError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("BOOKLINE_DB_PATH")?;
    let pool_size = match std::env::var("BOOKLINE_DB_POOL_SIZE") {
        Ok(raw) => raw.parse::<u32>().map_err(|e| {
            BooklineError::Config(format!("invalid BOOKLINE_DB_POOL_SIZE: {}", e))
        })?,
        Err(_) => DatabaseConfig::default().pool_size,
    };

    let client_id = env_var("BOOKLINE_GOOGLE_CLIENT_ID")?;
    let client_secret = env_var("BOOKLINE_GOOGLE_CLIENT_SECRET")?;

    let bind_addr = std::env::var("BOOKLINE_BIND_ADDR")
        .unwrap_or_else(|_| ServerConfig::default().bind_addr);

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size },
        google: GoogleApiConfig { client_id, client_secret },
        server: ServerConfig { bind_addr },
    })
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        BooklineError::Config(format!("cannot read config file {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| {
        BooklineError::Config(format!("invalid config file {}: {}", path.display(), e))
    })?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| BooklineError::Config(format!("missing environment variable {}", name)))
}
