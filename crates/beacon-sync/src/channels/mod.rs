//! Channel registry: liveness bookkeeping for live-data subscriptions.
//!
//! One entry per subscribed id, reference-counted across subscribers,
//! driven by transport events and the periodic sweep. The registry is the
//! only owner of channel state; everything else observes it through
//! snapshots.

mod entry;
mod registry;
mod types;

pub use registry::{ChannelRegistry, SweepOutcome};
pub use types::{ChannelEvent, ChannelId, ChannelSnapshot, ChannelState};
