//! Hermes Configuration
//!
//! Configuration of the boundary gateway, read from `hermes.toml`:
//! - which engine library to load, and where to look for it
//! - whether boundary calls are serialized
//! - the log filter
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Built-in defaults (loopback engine, unserialized calls)
//! 2. User config (`<config dir>/hermes/hermes.toml`)
//! 3. Project config (`hermes.toml`, found by walking up from a directory)
//! 4. Environment variables (`HERMES_*`)
//!
//! The user config is only read when no project config is found.
//!
//! # Example
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("serialize calls: {}", config.gateway.serialize_calls);
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Contents of `hermes.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the engine comes from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Library name (`hermes_ffi_test`) or path; absent selects the loopback engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    /// Directories searched before the platform defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Run every boundary call and its error read under one lock
    #[serde(default)]
    pub serialize_calls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `hermes_ffi=debug`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl HermesConfig {
    /// Parse a configuration from TOML text
    pub fn parse(content: &str, file: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: file.to_path_buf(),
            error: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;
        Self::parse(&content, path)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(library) = &self.engine.library {
            if library.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "engine.library".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if let Some(filter) = &self.logging.filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.filter".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Serialize back to TOML text
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            reason: e.to_string(),
        })
    }
}

pub use loader::ConfigLoader;
