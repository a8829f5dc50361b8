//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Prefix of environment variables that override file settings,
/// e.g. `LEADERBOARD__STORE__HOST`.
pub const ENV_PREFIX: &str = "LEADERBOARD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Which ranking store to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

/// Ranking store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_store_host")]
    pub host: String,

    #[serde(default = "default_store_port")]
    pub port: u16,

    /// Prefix for the keys holding this leaderboard
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Upper bound on each store round-trip
    #[serde(default = "default_store_timeout")]
    pub timeout_ms: u64,
}

fn default_store_host() -> String {
    "127.0.0.1".to_string()
}

fn default_store_port() -> u16 {
    6379
}

fn default_key_prefix() -> String {
    "leaderboard".to_string()
}

fn default_store_timeout() -> u64 {
    2000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            host: default_store_host(),
            port: default_store_port(),
            key_prefix: default_key_prefix(),
            timeout_ms: default_store_timeout(),
        }
    }
}

impl StoreConfig {
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Leaderboard listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Entries returned by the leaderboard endpoint
    #[serde(default = "default_size")]
    pub size: u64,

    /// Largest window a caller may request
    #[serde(default = "default_max_size")]
    pub max_size: u64,
}

fn default_size() -> u64 {
    10
}

fn default_max_size() -> u64 {
    100
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            max_size: default_max_size(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load an optional TOML file, then apply `LEADERBOARD__*` environment
    /// overrides on top.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.store.port == 0 {
            return Err(ConfigError::ValidationError(
                "Store port must be greater than 0".to_string(),
            ));
        }

        if self.store.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Store timeout must be greater than 0".to_string(),
            ));
        }

        if self.store.key_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Store key prefix must not be empty".to_string(),
            ));
        }

        if self.leaderboard.size == 0 || self.leaderboard.size > self.leaderboard.max_size {
            return Err(ConfigError::ValidationError(format!(
                "Leaderboard size must be between 1 and {}",
                self.leaderboard.max_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.port, 6379);
        assert_eq!(config.leaderboard.size, 10);
    }

    #[test]
    fn test_store_config_helpers() {
        let store = StoreConfig {
            host: "redis.internal".to_string(),
            port: 6380,
            timeout_ms: 1500,
            ..StoreConfig::default()
        };

        assert_eq!(store.redis_url(), "redis://redis.internal:6380/");
        assert_eq!(store.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.store.timeout_ms = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_leaderboard_size() {
        let mut config = AppConfig::default();
        config.leaderboard.size = 0;
        assert!(config.validate().is_err());

        config.leaderboard.size = 101;
        assert!(config.validate().is_err());

        config.leaderboard.max_size = 200;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"

            [leaderboard]
            size = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.host, "127.0.0.1");
        assert_eq!(config.leaderboard.size, 5);
        assert_eq!(config.leaderboard.max_size, 100);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8081\n\n[store]\nbackend = \"memory\"\nkey_prefix = \"arcade\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.key_prefix, "arcade");
        assert_eq!(config.leaderboard.size, 10);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.leaderboard.size, 10);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\ntimeout_ms = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.store.key_prefix, parsed.store.key_prefix);
        assert_eq!(config.server.port, parsed.server.port);
    }
}
