//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the sqlite file backing the store
    pub database_path: PathBuf,
    /// Directory scanned for `<name>/theme.json`
    pub themes_path: PathBuf,
    /// Default cache TTL in seconds
    pub default_ttl: u64,
    /// Interval in seconds between expired-entry sweeps
    pub eviction_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_PATH` - Store file (default: database/showcase.db)
    /// - `THEMES_PATH` - Themes directory (default: themes)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 86400)
    /// - `EVICTION_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            themes_path: env::var("THEMES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.themes_path),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            eviction_interval: parse_var("EVICTION_INTERVAL")
                .unwrap_or(defaults.eviction_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database/showcase.db"),
            themes_path: PathBuf::from("themes"),
            default_ttl: 86_400,
            eviction_interval: 300,
            server_port: 8080,
        }
    }
}
