//! Configuration loading
//!
//! The only externally configurable values are the prediction service base
//! address, the request timeout and the log level. Each is resolved in this
//! priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unparsable config file never stops startup: the lower tiers
//! apply and the problem is handed back as a diagnostic, so the caller can log
//! it once its tracing subscriber is installed.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Compiled default service address
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Compiled default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Compiled default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the service address
pub const API_URL_ENV: &str = "REPP_API_URL";

/// Environment variable overriding the request timeout (seconds)
pub const TIMEOUT_ENV: &str = "REPP_TIMEOUT_SECS";

/// Accepted `[logging] level` values
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Contents of `config.toml`
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Explicit config file, replacing the platform default location
    pub config_file: Option<PathBuf>,
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service base address, without trailing slash
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from all tiers, logging config file problems
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let (config, diagnostics) = Self::resolve_with_diagnostics(overrides)?;
        for problem in &diagnostics {
            warn!("{} (using defaults)", problem);
        }
        Ok(config)
    }

    /// Resolve configuration from all tiers
    ///
    /// An unreadable or unparsable config file is not fatal: it is skipped and
    /// returned in the diagnostics list instead of being logged here.
    pub fn resolve_with_diagnostics(overrides: &ConfigOverrides) -> Result<(Self, Vec<Error>)> {
        let mut diagnostics = Vec::new();
        let file_path = overrides.config_file.clone().or_else(default_config_path);
        let toml_config = match file_path.as_deref().map(load_toml_config) {
            Some(Ok(Some(config))) => config,
            Some(Err(e)) => {
                diagnostics.push(e);
                TomlConfig::default()
            }
            Some(Ok(None)) | None => TomlConfig::default(),
        };

        let api_base_url = match &overrides.api_base_url {
            Some(url) => url.clone(),
            None => match std::env::var(API_URL_ENV) {
                Ok(url) => url,
                Err(_) => toml_config
                    .api_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            },
        };

        let timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => secs,
            None => match std::env::var(TIMEOUT_ENV) {
                Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    Error::Config(format!("Invalid {} value '{}': {}", TIMEOUT_ENV, raw, e))
                })?,
                Err(_) => toml_config
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };

        if timeout_secs == 0 {
            return Err(Error::Config("Request timeout must be at least 1 second".to_string()));
        }

        let log_level = match toml_config.logging.level {
            Some(level) => normalize_log_level(&level)?,
            None => DEFAULT_LOG_LEVEL.to_string(),
        };

        let config = Self {
            api_base_url: normalize_base_url(&api_base_url)?,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        };
        debug!(?config, "Resolved client configuration");
        Ok((config, diagnostics))
    }
}

/// Platform config file location: `<config_dir>/repp/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("repp").join("config.toml"))
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(Error::Io(std::io::Error::new(
                e.kind(),
                format!("Could not read config file {}: {}", path.display(), e),
            )));
        }
    };

    toml::from_str::<TomlConfig>(&content)
        .map(Some)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Lowercase a log level and reject anything `EnvFilter` would not accept
fn normalize_log_level(raw: &str) -> Result<String> {
    let level = raw.trim().to_ascii_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(Error::Config(format!(
            "Invalid log level '{}' (expected one of: {})",
            raw,
            LOG_LEVELS.join(", ")
        )))
    }
}

/// Check the scheme and strip trailing slashes
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::Config(format!("Service address must start with http:// or https://: '{}'", raw))
        })?;

    if host.is_empty() {
        return Err(Error::Config(format!("Service address has no host: '{}'", raw)));
    }

    Ok(trimmed.to_string())
}
