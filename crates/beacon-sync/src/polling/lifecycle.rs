use serde::{Deserialize, Serialize};

/// Whether a domain entity's status can still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// The entity is still in flight; expect further updates.
    Active,
    /// The entity will not change again.
    Terminal,
}

/// Statuses that mean a run is still in flight.
pub const ACTIVE_STATUSES: [&str; 4] = ["created", "queued", "running", "waiting_approval"];

/// Classify a domain status string.
///
/// Total over all inputs: anything not in [`ACTIVE_STATUSES`] - including
/// unrecognized strings from a newer backend - classifies as terminal.
/// Failing toward terminal means failing toward slower polling, which is
/// the safe direction for an unknown status.
pub fn classify(status: &str) -> Lifecycle {
    if ACTIVE_STATUSES.contains(&status) {
        Lifecycle::Active
    } else {
        Lifecycle::Terminal
    }
}

/// Convenience wrapper over [`classify`].
pub fn is_active(status: &str) -> bool {
    classify(status) == Lifecycle::Active
}
