//! Configuration loading and run parameter resolution
//!
//! Run parameters are resolved in priority order:
//! 1. Command-line argument (highest priority, environment variables are
//!    folded in by the CLI parser)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops a run. Callers log the
//! error and continue with [`TomlConfig::default`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of download attempts per station
pub const DEFAULT_CONNECTION_ATTEMPTS: u32 = 2;

/// Default per-attempt timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Headers file name, looked up in a `data` folder next to the executable
pub const HEADERS_FILE_NAME: &str = "headers.json";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// SQLite database to scrape into
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// JSON file of HTTP headers sent with every playlist request
    #[serde(default)]
    pub headers_file: Option<PathBuf>,

    /// Download attempts per station
    #[serde(default)]
    pub connection_attempts: Option<u32>,

    /// Per-attempt timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from `explicit` if given, otherwise from the platform config path.
    ///
    /// Returns `Ok(None)` when no explicit path was given and the default
    /// file does not exist; that is the normal case, not an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path).map(Some),
            _ => Ok(None),
        }
    }
}

/// Platform configuration file: `<config dir>/playlog/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playlog").join("config.toml"))
}

/// Default headers file: `data/headers.json` beside the running executable
pub fn default_headers_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("data").join(HEADERS_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from("data").join(HEADERS_FILE_NAME))
}

/// Parameters for one scrape run after all sources are merged
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub database: PathBuf,
    pub connection_attempts: u32,
    pub timeout: Duration,
    pub headers_file: PathBuf,
}

/// Values supplied on the command line (or through their env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub database: Option<PathBuf>,
    pub connection_attempts: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub headers_file: Option<PathBuf>,
}

impl RunSettings {
    /// Merge overrides, TOML values and compiled defaults.
    ///
    /// Fails only when no database path is available from any source.
    /// Connection attempts are clamped to at least one.
    pub fn resolve(overrides: RunOverrides, toml: &TomlConfig) -> Result<Self> {
        let database = overrides
            .database
            .or_else(|| toml.database.clone())
            .ok_or_else(|| Error::Config("No database file given".to_string()))?;

        let connection_attempts = overrides
            .connection_attempts
            .or(toml.connection_attempts)
            .unwrap_or(DEFAULT_CONNECTION_ATTEMPTS)
            .max(1);

        let timeout_secs = overrides
            .timeout_secs
            .or(toml.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let headers_file = overrides
            .headers_file
            .or_else(|| toml.headers_file.clone())
            .unwrap_or_else(default_headers_path);

        Ok(Self {
            database,
            connection_attempts,
            timeout: Duration::from_secs(timeout_secs),
            headers_file,
        })
    }
}

/// Pick the log filter: explicit value first, then TOML, then the default
pub fn resolve_log_level(cli: Option<&str>, toml: &LoggingConfig) -> String {
    cli.map(str::to_string)
        .unwrap_or_else(|| toml.level.clone())
}
