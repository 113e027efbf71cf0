//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::notification::NotificationFilter;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Booking-management API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the bearer token comes from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Token issued by the auth service
    pub token: Option<String>,

    /// File holding the token, used when `token` is unset
    pub token_file: Option<String>,
}

/// Dashboard behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default)]
    pub default_filter: NotificationFilter,

    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_recent_activity_limit() -> usize {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            default_filter: NotificationFilter::default(),
            recent_activity_limit: default_recent_activity_limit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
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
            file: None,
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("booking-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/booking-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Load from an explicit path when given, default locations otherwise
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Refresh interval as a duration, never shorter than one second
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.dashboard.refresh_interval_secs.max(1))
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("BOOKING_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("BOOKING_API_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        // Session overrides
        if let Ok(token) = std::env::var("BOOKING_AUTH_TOKEN") {
            self.session.token = Some(token);
        }
        if let Ok(path) = std::env::var("BOOKING_TOKEN_FILE") {
            self.session.token_file = Some(path);
        }

        // Dashboard overrides
        if let Ok(secs) = std::env::var("BOOKING_REFRESH_SECS") {
            if let Ok(s) = secs.parse() {
                self.dashboard.refresh_interval_secs = s;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("BOOKING_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BOOKING_LOG_FORMAT") {
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
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Booking Dashboard Configuration
#
# Environment variables override these settings:
# - BOOKING_API_BASE_URL
# - BOOKING_API_TIMEOUT_SECS
# - BOOKING_AUTH_TOKEN
# - BOOKING_TOKEN_FILE
# - BOOKING_REFRESH_SECS
# - BOOKING_LOG_LEVEL
# - BOOKING_LOG_FORMAT

[api]
# Booking-management API base URL
base_url = "http://localhost:8080"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Bearer token issued at login
# token = ""

# File containing the token (used when token is unset)
# token_file = "~/.config/booking-dashboard/token"

[dashboard]
# How often to reload dashboard data (seconds)
refresh_interval_secs = 30

# Initial notification filter: all, unread, high
default_filter = "unread"

# Number of entries in the recent activity feed
recent_activity_limit = 5

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path (the live dashboard logs here instead of stderr)
# file = "/var/log/booking-dashboard/dashboard.log"
"#
    .to_string()
}
