//! # beacon-config
//!
//! TOML configuration types, loading, and validation for the beacon
//! synchronization layer.
//!
//! Single source of truth for every tunable the sync layer consumes:
//! channel liveness thresholds, reconnect policy, polling tiers, and the
//! gateway health probe cadence. Configuration is immutable once loaded;
//! the sync layer never mutates it at runtime.

mod defaults;
mod loading;
mod validation;

pub mod errors;
pub mod types;

// Public API re-exports
pub use errors::ConfigError;
pub use loading::{load_from_path, load_hierarchy, merge_configs};
pub use types::{
    BeaconConfig, ChannelConfig, HealthProbeConfig, PollingConfig, ReconnectConfig,
};
pub use validation::validate_config;

impl BeaconConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }
}
