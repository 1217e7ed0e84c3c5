//! Configuration validation logic.
//!
//! Ensures threshold and tier values are usable before the sync layer
//! starts timers with them.

use crate::errors::ConfigError;
use crate::types::BeaconConfig;

/// Validate a BeaconConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - Every duration must be non-zero (a zero sweep interval would spin; a
///   zero threshold would flap every channel on the first tick)
/// - The sweep interval must not exceed the stale threshold, or staleness
///   could only ever be observed late
/// - Polling tiers must be ordered ACTIVE <= MEDIUM <= BACKGROUND <= LONG
///
/// # Errors
///
/// Returns `ConfigError::InvalidConfiguration` describing the first rule
/// violated.
pub fn validate_config(config: &BeaconConfig) -> Result<(), ConfigError> {
    let durations = [
        ("channels.stale_threshold_ms", config.channels.stale_threshold()),
        (
            "channels.disconnect_threshold_ms",
            config.channels.disconnect_threshold(),
        ),
        ("channels.sweep_interval_ms", config.channels.sweep_interval()),
        ("channels.release_grace_ms", config.channels.release_grace()),
        ("reconnect.cooldown_ms", config.reconnect.cooldown()),
        ("polling.active_ms", config.polling.active()),
        ("polling.medium_ms", config.polling.medium()),
        ("polling.background_ms", config.polling.background()),
        ("polling.long_ms", config.polling.long()),
        ("health.refresh_interval_ms", config.health.refresh_interval()),
    ];
    for (name, duration) in durations {
        if duration.is_zero() {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("{} must be greater than zero", name),
            });
        }
    }

    if config.channels.sweep_interval() > config.channels.stale_threshold() {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "channels.sweep_interval_ms ({:?}) must not exceed channels.stale_threshold_ms ({:?})",
                config.channels.sweep_interval(),
                config.channels.stale_threshold()
            ),
        });
    }

    let polling = &config.polling;
    if !(polling.active() <= polling.medium()
        && polling.medium() <= polling.background()
        && polling.background() <= polling.long())
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "polling tiers must be ordered active <= medium <= background <= long"
                .to_string(),
        });
    }

    Ok(())
}
