//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data::FlowType;
use crate::dispatch::Selection;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Location of the pre-computed dataset files
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Initial selection and slope-chart emphasis
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_year")]
    pub default_year: String,

    #[serde(default = "default_flow")]
    pub default_flow: String,

    #[serde(default = "default_partner")]
    pub default_partner: String,

    /// Reporter codes whose slope-chart lines are flagged for emphasis
    #[serde(default)]
    pub emphasized: Vec<String>,
}

fn default_year() -> String {
    "2017".to_string()
}

fn default_flow() -> String {
    "EXPORT".to_string()
}

fn default_partner() -> String {
    "RU".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            default_flow: default_flow(),
            default_partner: default_partner(),
            emphasized: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// The selection every new session starts from
    pub fn default_selection(&self) -> Result<Selection, ConfigError> {
        let flow: FlowType = self
            .default_flow
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("dashboard.default_flow: {}", e)))?;

        Ok(Selection::new(
            self.default_year.clone(),
            flow,
            self.default_partner.clone(),
        ))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing file among the default config locations
    pub fn default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("trade-similarity").join("config.toml")),
            Some(PathBuf::from("/etc/trade-similarity/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        config_paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Load from an explicit path, the default locations, or the environment
    ///
    /// Returns the config and the file it came from, if any.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Ok((Self::load_with_env(&path)?, Some(path))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("TSI_DATA_DIR") {
            self.data.data_dir = data_dir;
        }

        if let Ok(host) = std::env::var("TSI_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("TSI_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(level) = std::env::var("TSI_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TSI_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Trade Similarity Index dashboard configuration
#
# Environment variables override these settings:
# - TSI_DATA_DIR
# - TSI_HOST
# - TSI_PORT
# - TSI_LOG_LEVEL
# - TSI_LOG_FORMAT

[server]
# Address to bind
host = "0.0.0.0"

# Port to listen on
port = 8050

# Allowed CORS origins (empty allows any origin)
cors_origins = []

[data]
# Directory holding years.json, partners.json, member_states.json,
# country_names.json, heatmap.json and slopechart.json
data_dir = "./data"

[dashboard]
# Selection shown when a page is first opened
default_year = "2017"
default_flow = "EXPORT"
default_partner = "RU"

# Reporter codes whose slope-chart lines are flagged for emphasis
emphasized = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
