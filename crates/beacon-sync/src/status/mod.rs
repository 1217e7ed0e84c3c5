//! Status derivation engine.
//!
//! Combines channel liveness, the gateway health probe, and the
//! reconnection-in-progress flag into the single user-facing connection
//! status. Pure projection over its inputs; nothing here is stored, so
//! there is no cache to invalidate.

mod summary;

pub use summary::{StatusSummary, summarize};

use serde::{Deserialize, Serialize};

use crate::channels::ChannelState;
use crate::health::HealthSnapshot;

/// User-facing connectivity indicator, derived on every observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinedStatus {
    Connected,
    Connecting,
    Stale,
    Disconnected,
    /// The gateway health probe is failing; channels may still be fine.
    Degraded,
}

impl CombinedStatus {
    /// Whether a reconnect-all cycle is allowed from this status.
    /// Healthy and in-progress states have nothing to reconnect.
    pub fn permits_reconnect(self) -> bool {
        matches!(
            self,
            CombinedStatus::Stale | CombinedStatus::Disconnected | CombinedStatus::Degraded
        )
    }
}

impl std::fmt::Display for CombinedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombinedStatus::Connected => write!(f, "connected"),
            CombinedStatus::Connecting => write!(f, "connecting"),
            CombinedStatus::Stale => write!(f, "stale"),
            CombinedStatus::Disconnected => write!(f, "disconnected"),
            CombinedStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Derive the combined status from the three inputs.
///
/// Precedence, first match wins:
/// 1. probe error -> degraded
/// 2. probe loading -> connecting
/// 3. reconnect in progress -> connecting
/// 4. no channels registered -> connected (bare gateway health)
/// 5. otherwise the least-healthy channel state
///
/// The worst-of rule in step 5 is deliberate: the indicator must reflect
/// the worst active problem, so a single disconnected channel is never
/// masked by healthy ones.
pub fn derive_status(
    probe: HealthSnapshot,
    reconnecting: bool,
    channels: &[ChannelState],
) -> CombinedStatus {
    if probe.error {
        return CombinedStatus::Degraded;
    }
    if probe.loading {
        return CombinedStatus::Connecting;
    }
    if reconnecting {
        return CombinedStatus::Connecting;
    }
    let Some(worst) = channels.iter().max_by_key(|state| state.severity()) else {
        return CombinedStatus::Connected;
    };
    match worst {
        ChannelState::Disconnected => CombinedStatus::Disconnected,
        ChannelState::Stale => CombinedStatus::Stale,
        ChannelState::Connecting => CombinedStatus::Connecting,
        ChannelState::Connected => CombinedStatus::Connected,
    }
}
