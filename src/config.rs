//! Configuration loading and constants.
//!
//! Resolves the application configuration from an optional TOML file, the
//! process environment and command line overrides, in increasing order of
//! priority. `AppConfig` is the root configuration struct.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// Defaults
// =============================================================================

/// Listen on all interfaces unless configured otherwise
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port used when neither the CLI, `PORT` nor the config file set one
pub const DEFAULT_PORT: u16 = 3000;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "pulse=info,tower_http=info";

// =============================================================================
// Environment Variables
// =============================================================================

pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Liveness answers must never be served from an intermediary cache
pub const CACHE_CONTROL_STATUS: &str = "no-store";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_PORT
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "Unknown log format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the effective configuration for this process.
    ///
    /// Priority: `cli_port` > process environment > config file > defaults.
    pub fn resolve(path: Option<&Path>, cli_port: Option<u16>) -> Result<Self, ConfigError> {
        Self::resolve_with(path, cli_port, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::resolve`] with an explicit environment lookup.
    pub fn resolve_with<F>(
        path: Option<&Path>,
        cli_port: Option<u16>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        match cli_port {
            Some(port) => config.http.port = port,
            None => {
                if let Some(port) = parse_port(lookup(PORT_ENV).as_deref())? {
                    config.http.port = port;
                }
            }
        }

        if let Some(format) = lookup(LOG_FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            config.logging.format = format.parse()?;
        }

        Ok(config)
    }
}

/// Parse a `PORT` value. Absent and empty values mean "not set".
pub fn parse_port(value: Option<&str>) -> Result<Option<u16>, ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPort {
                value: raw.to_string(),
            }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid PORT value '{value}': expected an integer between 0 and 65535")]
    InvalidPort { value: String },
    #[error("Configuration error: {0}")]
    Validation(String),
}
