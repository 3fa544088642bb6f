//! Application configuration structures

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub google: GoogleApiConfig,
    pub server: ServerConfig,
}

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "bookline.db".to_string(), pool_size: 4 }
    }
}

/// Google OAuth client credentials used for refresh-token exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleApiConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".to_string() }
    }
}
