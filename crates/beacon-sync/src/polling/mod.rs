//! Adaptive polling scheduler.
//!
//! Chooses the refetch interval for a query as a pure function of its
//! latest data (and, for dependent sub-resources, the parent's lifecycle
//! state). The data-fetch collaborator re-invokes the matching interval
//! function after every fetch; nothing here performs I/O, so every
//! function is safe to call on every poll tick.

mod lifecycle;

pub use lifecycle::{ACTIVE_STATUSES, Lifecycle, classify, is_active};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Named polling cadence tiers, fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollTier {
    Active,
    Medium,
    Background,
    Long,
}

/// Computed refetch interval for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollInterval {
    Every(Duration),
    /// No further polling; the resource cannot change anymore.
    Disabled,
}

impl PollInterval {
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            PollInterval::Every(duration) => Some(duration),
            PollInterval::Disabled => None,
        }
    }

    pub fn is_disabled(self) -> bool {
        matches!(self, PollInterval::Disabled)
    }
}

/// Immutable tier table, built once from config and shared process-wide.
///
/// The interval functions below use ACTIVE, MEDIUM, and BACKGROUND; LONG is
/// exposed for rarely-changing resources (agent metadata, static
/// configuration) that callers pace directly via [`PollingPolicy::tier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingPolicy {
    active: Duration,
    medium: Duration,
    background: Duration,
    long: Duration,
}

impl PollingPolicy {
    pub fn from_config(config: &beacon_config::PollingConfig) -> Self {
        Self {
            active: config.active(),
            medium: config.medium(),
            background: config.background(),
            long: config.long(),
        }
    }

    pub fn tier(&self, tier: PollTier) -> Duration {
        match tier {
            PollTier::Active => self.active,
            PollTier::Medium => self.medium,
            PollTier::Background => self.background,
            PollTier::Long => self.long,
        }
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self::from_config(&beacon_config::PollingConfig::default())
    }
}

/// Read access to the lifecycle-bearing status string of a polled entity.
pub trait LifecycleStatus {
    fn lifecycle_status(&self) -> &str;
}

impl LifecycleStatus for &str {
    fn lifecycle_status(&self) -> &str {
        self
    }
}

impl LifecycleStatus for String {
    fn lifecycle_status(&self) -> &str {
        self
    }
}

/// Interval for a collection query (list of entities).
///
/// ACTIVE while any fetched item is still in flight, MEDIUM once everything
/// has settled. An unfetched or empty collection polls at ACTIVE: when
/// uncertain, prefer fast polling to minimize time-to-first-render.
pub fn collection_interval<T: LifecycleStatus>(
    items: Option<&[T]>,
    policy: &PollingPolicy,
) -> PollInterval {
    let tier = match items {
        None => PollTier::Active,
        Some([]) => PollTier::Active,
        Some(items) if items.iter().any(|item| is_active(item.lifecycle_status())) => {
            PollTier::Active
        }
        Some(_) => PollTier::Medium,
    };
    PollInterval::Every(policy.tier(tier))
}

/// Interval for a single-entity query.
///
/// ACTIVE while the entity is absent (not yet fetched) or still in flight;
/// BACKGROUND once terminal, so a finished run's detail view keeps itself
/// fresh without hammering the gateway.
pub fn entity_interval<T: LifecycleStatus>(
    entity: Option<&T>,
    policy: &PollingPolicy,
) -> PollInterval {
    let tier = match entity {
        None => PollTier::Active,
        Some(entity) if is_active(entity.lifecycle_status()) => PollTier::Active,
        Some(_) => PollTier::Background,
    };
    PollInterval::Every(policy.tier(tier))
}

/// Interval for a dependent sub-resource query (e.g. child records of a
/// run), driven by the externally supplied **parent** status.
///
/// The child payload carries no reliable lifecycle signal once the parent
/// stops changing, so the caller composes the two queries: fetch the
/// parent, then hand its status here. Polling is disabled outright once
/// the parent is terminal; an unfetched parent polls at ACTIVE.
pub fn dependent_interval(parent_status: Option<&str>, policy: &PollingPolicy) -> PollInterval {
    match parent_status {
        None => PollInterval::Every(policy.tier(PollTier::Active)),
        Some(status) if is_active(status) => PollInterval::Every(policy.tier(PollTier::Active)),
        Some(_) => PollInterval::Disabled,
    }
}
