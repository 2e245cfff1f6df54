//! Configuration schema definitions

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_SECRET: &str = "fallback-secret";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Connection string. Absent (or empty) means databaseless mode.
    #[serde(default)]
    pub uri: Option<String>,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret")]
    pub secret: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session lifetime in seconds (7 days)
    #[serde(default = "default_session_expires_in")]
    pub session_expires_in_secs: i64,

    /// Argon2 memory cost for new password hashes, in KiB
    #[serde(default = "default_password_memory_kib")]
    pub password_memory_kib: u32,

    /// Argon2 passes for new password hashes
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

fn default_secret() -> String {
    DEFAULT_AUTH_SECRET.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_session_expires_in() -> i64 {
    60 * 60 * 24 * 7
}

fn default_password_memory_kib() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            base_url: default_base_url(),
            session_expires_in_secs: default_session_expires_in(),
            password_memory_kib: default_password_memory_kib(),
            password_iterations: default_password_iterations(),
        }
    }
}

impl Config {
    /// Connection string, if one is configured and non-empty
    pub fn database_uri(&self) -> Option<&str> {
        self.database
            .uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }

    /// Whether the app runs against a database or in databaseless mode.
    ///
    /// This only reflects configuration; a configured database may still be
    /// unreachable, in which case the auth service degrades on its own.
    pub fn has_database(&self) -> bool {
        self.database_uri().is_some()
    }

    /// Config with a connection string set, mostly for tests and tooling
    pub fn with_database_uri(mut self, uri: impl Into<String>) -> Self {
        self.database.uri = Some(uri.into());
        self
    }
}
