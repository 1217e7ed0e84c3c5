//! Configuration types for the beacon synchronization layer.
//!
//! Every field is optional in the TOML so partial config files merge over
//! the built-in defaults; accessors resolve the effective value. Durations
//! are millisecond integers in TOML and `std::time::Duration` at the API
//! boundary.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Root configuration for the synchronization layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeaconConfig {
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub health: HealthProbeConfig,
}

/// Channel liveness thresholds and sweep cadence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Silence on a connected channel before it is considered stale, in ms.
    pub stale_threshold_ms: Option<u64>,
    /// Time in stale (from the stale transition) before disconnected, in ms.
    pub disconnect_threshold_ms: Option<u64>,
    /// Cadence of the background liveness sweep, in ms.
    pub sweep_interval_ms: Option<u64>,
    /// How long a zero-subscriber entry survives before removal, in ms.
    pub release_grace_ms: Option<u64>,
}

impl ChannelConfig {
    pub fn stale_threshold(&self) -> Duration {
        Duration::from_millis(self.stale_threshold_ms.unwrap_or(defaults::STALE_THRESHOLD_MS))
    }

    pub fn disconnect_threshold(&self) -> Duration {
        Duration::from_millis(
            self.disconnect_threshold_ms
                .unwrap_or(defaults::DISCONNECT_THRESHOLD_MS),
        )
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms.unwrap_or(defaults::SWEEP_INTERVAL_MS))
    }

    pub fn release_grace(&self) -> Duration {
        Duration::from_millis(self.release_grace_ms.unwrap_or(defaults::RELEASE_GRACE_MS))
    }

    /// Merge with `override_config` taking precedence for set fields.
    pub fn merge(&self, override_config: &Self) -> Self {
        Self {
            stale_threshold_ms: override_config.stale_threshold_ms.or(self.stale_threshold_ms),
            disconnect_threshold_ms: override_config
                .disconnect_threshold_ms
                .or(self.disconnect_threshold_ms),
            sweep_interval_ms: override_config.sweep_interval_ms.or(self.sweep_interval_ms),
            release_grace_ms: override_config.release_grace_ms.or(self.release_grace_ms),
        }
    }
}

/// Reconnect-all storm prevention policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Minimum spacing between reconnect cycles, in ms.
    pub cooldown_ms: Option<u64>,
    /// Whether the sweep triggers reconnection on its own once the
    /// combined status reaches disconnected.
    pub auto: Option<bool>,
}

impl ReconnectConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms.unwrap_or(defaults::RECONNECT_COOLDOWN_MS))
    }

    pub fn auto_reconnect(&self) -> bool {
        self.auto.unwrap_or(defaults::AUTO_RECONNECT)
    }

    pub fn merge(&self, override_config: &Self) -> Self {
        Self {
            cooldown_ms: override_config.cooldown_ms.or(self.cooldown_ms),
            auto: override_config.auto.or(self.auto),
        }
    }
}

/// Polling cadence tiers, in ms.
///
/// ACTIVE paces entities that are still changing, MEDIUM collections with
/// no active entries, BACKGROUND settled single entities, and LONG
/// rarely-changing resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    pub active_ms: Option<u64>,
    pub medium_ms: Option<u64>,
    pub background_ms: Option<u64>,
    pub long_ms: Option<u64>,
}

impl PollingConfig {
    pub fn active(&self) -> Duration {
        Duration::from_millis(self.active_ms.unwrap_or(defaults::POLL_ACTIVE_MS))
    }

    pub fn medium(&self) -> Duration {
        Duration::from_millis(self.medium_ms.unwrap_or(defaults::POLL_MEDIUM_MS))
    }

    pub fn background(&self) -> Duration {
        Duration::from_millis(self.background_ms.unwrap_or(defaults::POLL_BACKGROUND_MS))
    }

    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms.unwrap_or(defaults::POLL_LONG_MS))
    }

    pub fn merge(&self, override_config: &Self) -> Self {
        Self {
            active_ms: override_config.active_ms.or(self.active_ms),
            medium_ms: override_config.medium_ms.or(self.medium_ms),
            background_ms: override_config.background_ms.or(self.background_ms),
            long_ms: override_config.long_ms.or(self.long_ms),
        }
    }
}

/// Gateway health probe cadence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProbeConfig {
    /// Cadence at which the data-fetch collaborator refreshes the gateway
    /// health query, in ms.
    pub refresh_interval_ms: Option<u64>,
}

impl HealthProbeConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(
            self.refresh_interval_ms
                .unwrap_or(defaults::HEALTH_REFRESH_INTERVAL_MS),
        )
    }

    pub fn merge(&self, override_config: &Self) -> Self {
        Self {
            refresh_interval_ms: override_config
                .refresh_interval_ms
                .or(self.refresh_interval_ms),
        }
    }
}
