//! Configuration Loader
//!
//! Finds `hermes.toml`, falls back to the user config, then applies
//! environment overrides.

use crate::{ConfigError, ConfigResult, HermesConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "hermes.toml";

/// Engine library name or path
pub const ENV_ENGINE_LIBRARY: &str = "HERMES_ENGINE_LIBRARY";
/// `true`/`1`/`yes` or `false`/`0`/`no`
pub const ENV_SERIALIZE_CALLS: &str = "HERMES_SERIALIZE_CALLS";
/// `tracing` filter directive
pub const ENV_LOG: &str = "HERMES_LOG";

/// Configuration loader
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader that falls back to `<config dir>/hermes/hermes.toml`
    pub fn new() -> Self {
        Self {
            user_config_path: dirs::config_dir()
                .map(|dir| dir.join("hermes").join(CONFIG_FILE_NAME)),
        }
    }

    /// Loader that falls back to the given user config file
    pub fn with_user_config(path: impl Into<PathBuf>) -> Self {
        Self {
            user_config_path: Some(path.into()),
        }
    }

    /// Loader with no user-level fallback
    pub fn without_user_config() -> Self {
        Self {
            user_config_path: None,
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find `hermes.toml`. Without one, the
    /// user config is used if it exists, else the defaults.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<HermesConfig> {
        let config = match self.find_project_config(start_dir) {
            Some(path) => HermesConfig::load_from_file(&path)?,
            None => self.load_user_config()?,
        };
        self.apply_env_overrides(config)
    }

    /// Load configuration from a specific file, then apply overrides
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<HermesConfig> {
        let config = HermesConfig::load_from_file(config_path)?;
        self.apply_env_overrides(config)
    }

    /// Path of the nearest `hermes.toml` at or above `start_dir`
    pub fn find_project_config(&self, start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.exists())
    }

    fn load_user_config(&self) -> ConfigResult<HermesConfig> {
        match &self.user_config_path {
            Some(path) if path.exists() => HermesConfig::load_from_file(path),
            _ => Ok(HermesConfig::default()),
        }
    }

    /// Apply `HERMES_*` environment variables on top of `config`
    pub fn apply_env_overrides(&self, mut config: HermesConfig) -> ConfigResult<HermesConfig> {
        if let Ok(library) = env::var(ENV_ENGINE_LIBRARY) {
            config.engine.library = Some(library);
        }

        if let Ok(serialize) = env::var(ENV_SERIALIZE_CALLS) {
            config.gateway.serialize_calls = parse_bool(ENV_SERIALIZE_CALLS, &serialize)?;
        }

        if let Ok(filter) = env::var(ENV_LOG) {
            config.logging.filter = Some(filter);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(field: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
