//! Configuration management.
//!
//! Startup configuration comes from CLI flags with an optional TOML config
//! file underneath. Precedence per field: CLI flag, then config file, then
//! default. The cache directory has no default; it must come from one of
//! the two sources.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON lines, one event per line.
    Json,
}

impl LogFormat {
    /// Parses a format string, defaulting to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Resolved configuration for the stockroom server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Directory holding the snapshot file and photo files. Created at
    /// startup if absent; failure to create it is fatal.
    pub cache_dir: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Resolves the configuration from CLI-provided values over an
    /// optional config file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the cache directory is given by neither
    /// source, and `OperationFailed` when the config file cannot be read
    /// or parsed.
    pub fn resolve(
        cli: CliOverrides,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let cache_dir = cli
            .cache_dir
            .or_else(|| file.cache_dir.map(PathBuf::from))
            .ok_or_else(|| {
                Error::InvalidInput(
                    "cache directory is required (pass --cache or set cache_dir in the config file)"
                        .to_string(),
                )
            })?;

        Ok(Self {
            host: cli
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            cache_dir,
            log_format: cli
                .log_format
                .or_else(|| file.log.and_then(|l| l.format).as_deref().map(LogFormat::parse))
                .unwrap_or_default(),
        })
    }

    /// Returns the address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-field values taken from the command line, each optional.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Bind host, if passed.
    pub host: Option<String>,
    /// Bind port, if passed.
    pub port: Option<u16>,
    /// Cache directory, if passed.
    pub cache_dir: Option<PathBuf>,
    /// Log format, if passed.
    pub log_format: Option<LogFormat>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Bind host.
    pub host: Option<String>,
    /// Bind port.
    pub port: Option<u16>,
    /// Cache directory.
    pub cache_dir: Option<String>,
    /// Logging section.
    pub log: Option<ConfigFileLog>,
}

/// Logging section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLog {
    /// Output format: "text" or "json".
    pub format: Option<String>,
}

impl ConfigFile {
    /// Loads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `OperationFailed` when the file cannot be read or parsed.
    /// Unlike the snapshot loader, a broken config file is fatal: silently
    /// ignoring it would bind the wrong address or cache directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config", e))?;
        toml::from_str(&raw).map_err(|e| Error::operation("parse_config", e))
    }
}
