//! Configuration management for logofinder.
//!
//! Defaults live in `config/logofinder.toml`, embedded at compile time.
//! A file at `./config/logofinder.toml` overrides them; command-line flags
//! override both.

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to the working directory
pub const CONFIG_PATH: &str = "./config/logofinder.toml";

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = include_str!("../config/logofinder.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Configuration field '{field}' must be greater than zero")]
    ZeroValue { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub render: RenderConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration for asset downloads
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

/// Page rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Fixed pause after page load so client-side rendering can finish
    pub settle_delay_ms: u64,
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub parallel_jobs: usize,
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub results_file: String,
    pub assets_dir: String,
}

impl AppConfig {
    /// Load from the default path, falling back to the compiled-in defaults
    /// when no config file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue {
                field: "http.request_timeout_secs".to_string(),
            });
        }
        if self.fetch.parallel_jobs == 0 {
            return Err(ConfigError::ZeroValue {
                field: "fetch.parallel_jobs".to_string(),
            });
        }
        if self.output.results_file.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "output.results_file".to_string(),
            });
        }
        if self.output.assets_dir.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "output.assets_dir".to_string(),
            });
        }
        Ok(())
    }

    /// Create the default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }
}
