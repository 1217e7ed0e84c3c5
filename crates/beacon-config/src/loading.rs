//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Built-in defaults** - every field has a fallback value
//! 2. **User config** - `~/.beacon/config.toml` (global user preferences)
//! 3. **Project config** - `./.beacon/config.toml` (project-specific overrides)
//!
//! Missing files are not errors; parse failures are.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::ConfigError;
use crate::types::BeaconConfig;
use crate::validation::validate_config;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a present config file fails to parse or if the final
/// merged configuration fails validation. Missing config files are not
/// errors.
pub fn load_hierarchy() -> Result<BeaconConfig, ConfigError> {
    let mut config = BeaconConfig::default();

    if let Some(path) = user_config_path()
        && let Some(user_config) = load_optional(&path)?
    {
        debug!(event = "config.load.user_config_loaded", path = %path.display());
        config = merge_configs(&config, &user_config);
    }

    let project_path = project_config_path();
    if let Some(project_config) = load_optional(&project_path)? {
        debug!(
            event = "config.load.project_config_loaded",
            path = %project_path.display()
        );
        config = merge_configs(&config, &project_config);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load and validate a configuration file from an explicit path.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, unparseable, or
/// invalid.
pub fn load_from_path(path: &Path) -> Result<BeaconConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Merge two configurations, with `override_config` taking precedence for
/// every field it sets.
pub fn merge_configs(base: &BeaconConfig, override_config: &BeaconConfig) -> BeaconConfig {
    BeaconConfig {
        channels: base.channels.merge(&override_config.channels),
        reconnect: base.reconnect.merge(&override_config.reconnect),
        polling: base.polling.merge(&override_config.polling),
        health: base.health.merge(&override_config.health),
    }
}

/// Read a config file, treating "not found" as `None`.
fn load_optional(path: &Path) -> Result<Option<BeaconConfig>, ConfigError> {
    match read_config_file(path) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::IoError { source }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn read_config_file(path: &Path) -> Result<BeaconConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".beacon").join("config.toml"))
}

fn project_config_path() -> PathBuf {
    PathBuf::from(".beacon").join("config.toml")
}
