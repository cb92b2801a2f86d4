//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default log file, relative to the working directory.
pub const DEFAULT_AOF_PATH: &str = "append-only.aof";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Location of the append-only log
    pub aof_path: PathBuf,
    /// Period of the log flush task in milliseconds
    pub flush_interval_ms: u64,
    /// Period of the expiry sweeper in milliseconds
    pub sweep_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `AOF_PATH` - Log file path (default: `append-only.aof`)
    /// - `FLUSH_INTERVAL_MS` - Log flush period (default: 3000)
    /// - `SWEEP_INTERVAL_MS` - Expiry sweep period (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            aof_path: env::var("AOF_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.aof_path),
            flush_interval_ms: parse_var("FLUSH_INTERVAL_MS").unwrap_or(defaults.flush_interval_ms),
            sweep_interval_ms: parse_var("SWEEP_INTERVAL_MS").unwrap_or(defaults.sweep_interval_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Returns a default config writing its log to `path`.
    pub fn with_aof_path(path: impl Into<PathBuf>) -> Self {
        Self {
            aof_path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the capacity, builder style.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Rejects values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.flush_interval_ms == 0 || self.sweep_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "background intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 100,
            aof_path: PathBuf::from(DEFAULT_AOF_PATH),
            flush_interval_ms: 3000,
            sweep_interval_ms: 1000,
            server_port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.aof_path, PathBuf::from("append-only.aof"));
        assert_eq!(config.flush_interval(), Duration::from_secs(3));
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("AOF_PATH");
        env::remove_var("FLUSH_INTERVAL_MS");
        env::remove_var("SWEEP_INTERVAL_MS");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.aof_path, PathBuf::from(DEFAULT_AOF_PATH));
        assert_eq!(config.flush_interval_ms, 3000);
        assert_eq!(config.sweep_interval_ms, 1000);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = Config::default().capacity(0);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            flush_interval_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}
