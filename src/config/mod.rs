//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::models::is_valid_season;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Results provider (REST API) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the results API, e.g. `http://localhost:8000/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Rows requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Pause between page requests
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Give up after this many pages
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Max retries per page
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout() -> u64 {
    30
}

fn default_request_delay() -> u64 {
    250
}

fn default_max_pages() -> u32 {
    500
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
            request_delay_ms: default_request_delay(),
            max_pages: default_max_pages(),
            max_retries: default_max_retries(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Season selection defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Season used when none is given and none has been saved
    #[serde(default)]
    pub default: Option<i32>,
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
    8080
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

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub season: SeasonConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            season: SeasonConfig::default(),
            provider: ProviderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Provider timeout must be greater than 0".to_string(),
            ));
        }

        if self.provider.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "Provider page size must be greater than 0".to_string(),
            ));
        }

        if self.provider.max_pages == 0 {
            return Err(ConfigError::ValidationError(
                "Provider max pages must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.provider.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Provider base URL is not a valid URL: {}",
                self.provider.base_url
            )));
        }

        if let Some(year) = self.season.default {
            if !is_valid_season(year) {
                return Err(ConfigError::ValidationError(format!(
                    "Default season {} is before the first championship",
                    year
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
