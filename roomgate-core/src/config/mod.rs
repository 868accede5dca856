//! Configuration management for RoomGate
//!
//! This module provides file- and environment-based configuration with
//! defaults and validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod error;

pub use error::ConfigError;

use crate::core_room::room::DEFAULT_MAX_NAME_LENGTH;
use crate::logging::LogLevel;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store configuration
    pub store: StoreConfig,

    /// Resolver configuration
    pub resolver: ResolverConfig,

    /// Room creation rules
    pub rooms: RoomsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub pool_size: u32,
}

/// Room access resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Issue the public and member reads concurrently
    pub concurrent_reads: bool,

    /// Upper bound on each directory read; slower reads count as unavailable
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
}

/// Room creation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// Maximum room name length, in characters
    pub max_name_length: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./data/rooms.db"),
            pool_size: 4,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrent_reads: true,
            read_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

fn parse_var<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| ConfigError::InvalidEnv {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: ROOMGATE_<SECTION>_<KEY>
    /// Example: ROOMGATE_STORE_DATABASE_PATH=/var/lib/roomgate/rooms.db
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `ROOMGATE_*` environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Store config
        if let Ok(path) = env::var("ROOMGATE_STORE_DATABASE_PATH") {
            self.store.database_path = PathBuf::from(path);
        }
        if let Some(size) = parse_var("ROOMGATE_STORE_POOL_SIZE")? {
            self.store.pool_size = size;
        }

        // Resolver config
        if let Some(concurrent) = parse_var("ROOMGATE_RESOLVER_CONCURRENT_READS")? {
            self.resolver.concurrent_reads = concurrent;
        }
        if let Ok(timeout) = env::var("ROOMGATE_RESOLVER_READ_TIMEOUT") {
            self.resolver.read_timeout =
                humantime::parse_duration(timeout.trim()).map_err(|e| ConfigError::InvalidEnv {
                    var: "ROOMGATE_RESOLVER_READ_TIMEOUT",
                    reason: e.to_string(),
                })?;
        }

        // Rooms config
        if let Some(max) = parse_var("ROOMGATE_ROOMS_MAX_NAME_LENGTH")? {
            self.rooms.max_name_length = max;
        }

        // Logging config
        if let Ok(level) = env::var("ROOMGATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = parse_var("ROOMGATE_LOG_JSON")? {
            self.logging.json_format = json;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.pool_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "pool_size must be greater than 0".to_string(),
            ));
        }

        if self.resolver.read_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "read_timeout must be greater than 0".to_string(),
            ));
        }

        if self.rooms.max_name_length == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_name_length must be greater than 0".to_string(),
            ));
        }

        self.logging
            .level
            .parse::<LogLevel>()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
