//! Built-in default values for every tunable.
//!
//! All timing values are policy choices tuned for dashboard UX, not hard
//! requirements; users override them via `~/.beacon/config.toml` or the
//! project-local `./.beacon/config.toml`.

/// Silence on a connected channel before it is considered stale.
pub const STALE_THRESHOLD_MS: u64 = 15_000;

/// Time a channel may sit in stale (measured from the stale transition)
/// before it is considered disconnected.
pub const DISCONNECT_THRESHOLD_MS: u64 = 45_000;

/// Cadence of the background liveness sweep.
pub const SWEEP_INTERVAL_MS: u64 = 1_000;

/// How long a zero-subscriber channel entry is kept before the transport
/// is closed and the entry removed. Tolerates rapid remount during
/// navigation.
pub const RELEASE_GRACE_MS: u64 = 3_000;

/// Minimum spacing between reconnect-all cycles.
pub const RECONNECT_COOLDOWN_MS: u64 = 2_000;

/// Whether the sweep triggers a reconnect cycle on its own when the
/// combined status reaches disconnected.
pub const AUTO_RECONNECT: bool = true;

/// ACTIVE polling tier: entities that are still changing.
pub const POLL_ACTIVE_MS: u64 = 2_000;

/// MEDIUM polling tier: collections with no active entries.
pub const POLL_MEDIUM_MS: u64 = 10_000;

/// BACKGROUND polling tier: settled single entities.
pub const POLL_BACKGROUND_MS: u64 = 30_000;

/// LONG polling tier: rarely-changing resources (metadata, static config).
pub const POLL_LONG_MS: u64 = 120_000;

/// Cadence at which the data-fetch collaborator refreshes the gateway
/// health query.
pub const HEALTH_REFRESH_INTERVAL_MS: u64 = 10_000;
