//! Configuration management for Lesson Fetcher
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then environment variables. A commented default file can be generated
//! on first run so the tool works with zero setup.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::ClientConfig;
use crate::constants::{api, files, http, logging, storage};
use crate::errors::{AppError, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Backend API settings
    pub api: ApiConfigToml,
    /// Local storage settings
    pub storage: StorageConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfigToml {
    /// Backend base URL
    pub base_url: String,
}

impl Default for ApiConfigToml {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// TOML-friendly local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfigToml {
    /// Data root directory holding the session record and downloads
    /// (leave empty to use the platform data directory)
    pub data_root: Option<PathBuf>,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Request timeout in seconds for API calls
    pub request_timeout_secs: u64,
    /// Overall timeout in seconds for signed-URL file downloads
    pub download_timeout_secs: u64,
    /// TCP keep-alive interval in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Maximum connections per host
    pub pool_max_per_host: usize,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            request_timeout_secs: http::REQUEST_TIMEOUT.as_secs(),
            download_timeout_secs: http::DOWNLOAD_TIMEOUT.as_secs(),
            tcp_keepalive_secs: Some(http::TCP_KEEPALIVE.as_secs()),
            tcp_nodelay: true,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = if let Some(ref path) = config_file_override {
            Some(path.clone())
        } else {
            Self::find_config_file()?
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Reading config file: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(AppError::generic(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Write a commented default config file if none exists yet
    pub async fn initialize_first_run() -> Result<PathBuf> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            // Existing file wins, never overwrite here
            return Ok(config_path);
        }

        info!("Writing default configuration file");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::generic(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let config_content = Self::generate_default_config_content();

        tokio::fs::write(&config_path, config_content)
            .await
            .map_err(|e| {
                AppError::generic(format!(
                    "Failed to write config file {}: {}",
                    config_path.display(),
                    e
                ))
            })?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   Edit this file to customize settings.");
        println!();

        Ok(config_path)
    }

    /// Search the standard locations for a config file
    fn find_config_file() -> Result<Option<PathBuf>> {
        let search_paths = vec![
            // Project-local config
            PathBuf::from("./lesson-fetcher.toml"),
            // User config
            Self::get_default_config_path()?,
            // System config (Unix only)
            #[cfg(unix)]
            PathBuf::from("/etc/lesson-fetcher/config.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                debug!("Using config file: {}", path.display());
                return Ok(Some(path));
            }
        }

        debug!("No config file present; running on defaults");
        Ok(None)
    }

    /// Per-user config file path under the platform config directory
    pub fn get_default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;

        Ok(config_dir
            .join(storage::APP_DIR_NAME)
            .join(storage::CONFIG_FILE_NAME))
    }

    /// Parse a TOML config file into settings
    async fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::generic(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            AppError::generic(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(crate::constants::env::BASE_URL) {
            if !value.trim().is_empty() {
                debug!("Overriding base URL from environment");
                self.api.base_url = value;
            }
        }
        if let Ok(value) = std::env::var(crate::constants::env::DATA_DIR) {
            if !value.trim().is_empty() {
                debug!("Overriding data root from environment");
                self.storage.data_root = Some(PathBuf::from(value));
            }
        }
    }

    /// Parsed backend base URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api.base_url).map_err(|e| {
            AppError::generic(format!("Invalid base URL '{}': {}", self.api.base_url, e))
        })
    }

    /// Resolve the data root directory
    pub fn data_root(&self) -> Result<PathBuf> {
        if let Some(ref root) = self.storage.data_root {
            return Ok(root.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::generic("Could not determine user data directory"))?;

        Ok(data_dir.join(storage::APP_DIR_NAME))
    }

    /// Path of the durable session record
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(self.data_root()?.join(files::SESSION_FILE))
    }

    /// Root directory for downloaded study material
    pub fn downloads_root(&self) -> Result<PathBuf> {
        Ok(self.data_root()?.join(storage::DOWNLOADS_DIR))
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        let default_data_path = dirs::data_dir()
            .map(|dir| dir.join(storage::APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("./lesson-fetcher"));

        format!(
            r#"# Lesson Fetcher Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[api]
# Backend base URL (also settable via LESSON_API_BASE_URL)
base_url = "{}"

[storage]
# Data root holding session.json and downloads/
# Default: {}
# data_root = "/path/to/custom/data"

[client]
# HTTP client settings
connect_timeout_secs = {}
request_timeout_secs = {}
download_timeout_secs = {}
tcp_keepalive_secs = {}
tcp_nodelay = true
pool_max_per_host = {}

[logging]
# Logging configuration
level = "info"  # error, warn, info, debug, trace
colored_output = true
"#,
            api::DEFAULT_BASE_URL,
            default_data_path.display(),
            http::CONNECT_TIMEOUT.as_secs(),
            http::REQUEST_TIMEOUT.as_secs(),
            http::DOWNLOAD_TIMEOUT.as_secs(),
            http::TCP_KEEPALIVE.as_secs(),
            http::POOL_MAX_PER_HOST,
        )
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            tcp_nodelay: self.tcp_nodelay,
            pool_max_per_host: self.pool_max_per_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_config_creation() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, api::DEFAULT_BASE_URL);
        assert_eq!(config.client.connect_timeout_secs, 30);
        assert_eq!(config.client.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.data_root.is_none());
    }

    #[tokio::test]
    async fn test_config_file_generation() {
        let content = AppConfig::generate_default_config_content();

        // Should be valid TOML
        let parsed: AppConfig = toml::from_str(&content).unwrap();

        assert_eq!(parsed.api.base_url, api::DEFAULT_BASE_URL);
        assert!(content.contains("# Lesson Fetcher Configuration"));
        assert!(content.contains("[api]"));
        assert!(content.contains("[client]"));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        // Should fail when explicitly specified
        let result = AppConfig::load(Some(config_path)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let test_config = r#"
[api]
base_url = "https://lessons.example.com/"

[client]
connect_timeout_secs = 10
request_timeout_secs = 20
download_timeout_secs = 120
tcp_keepalive_secs = 30
tcp_nodelay = true
pool_max_per_host = 4

[logging]
level = "debug"
colored_output = false
"#;

        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();

        assert_eq!(config.api.base_url, "https://lessons.example.com/");
        assert_eq!(config.client.connect_timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");

        let runtime = config.client.to_runtime_config();
        assert_eq!(runtime.request_timeout, Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");

        let test_config = r#"
[api]
base_url = "https://staging.example.com/"
"#;

        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();

        assert_eq!(config.api.base_url, "https://staging.example.com/");
        // Unspecified sections fall back to defaults
        assert_eq!(config.client.connect_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn test_storage_paths_derive_from_data_root() {
        let config = AppConfig {
            storage: StorageConfigToml {
                data_root: Some(PathBuf::from("/tmp/lesson-test")),
            },
            ..Default::default()
        };

        assert_eq!(
            config.session_file().unwrap(),
            PathBuf::from("/tmp/lesson-test/session.json")
        );
        assert_eq!(
            config.downloads_root().unwrap(),
            PathBuf::from("/tmp/lesson-test/downloads")
        );
    }
}
