//! beacon-sync: client-side real-time synchronization layer
//!
//! Keeps the monitoring dashboard's live-data subscriptions and polled
//! resources coherent: per-channel liveness tracking, one derived
//! connectivity status, storm-safe reconnection, and adaptive polling
//! cadence. Rendering, HTTP proxying, and the backend itself live
//! elsewhere; this crate only speaks to a transport collaborator and a
//! health-probe collaborator through the traits in [`transport`] and
//! [`health`].
//!
//! # Main Entry Points
//!
//! - [`hub::SyncHub`] - subscribe to channels, observe combined status,
//!   trigger reconnection
//! - [`polling`] - interval functions the data-fetch collaborator calls
//!   after every fetch
//! - [`status`] - the pure status derivation engine
//! - [`channels`] - the channel registry underneath the hub

pub mod channels;
pub mod errors;
pub mod health;
pub mod hub;
pub mod logging;
pub mod polling;
pub mod status;
pub mod transport;

mod reconnect;

// Re-export the surface UI components actually use
pub use channels::{ChannelId, ChannelSnapshot, ChannelState};
pub use errors::{BeaconError, BeaconResult};
pub use health::{HealthProbe, HealthSnapshot, StaticProbe};
pub use hub::{ChannelHandle, SyncHub};
pub use polling::{
    Lifecycle, LifecycleStatus, PollInterval, PollTier, PollingPolicy, classify,
    collection_interval, dependent_interval, entity_interval, is_active,
};
pub use status::{CombinedStatus, StatusSummary, derive_status, summarize};
pub use transport::{ChannelTransport, NoopTransport, RecordingTransport, TransportCall};

// Re-export config types so embedders need only one import
pub use beacon_config::BeaconConfig;

// Re-export logging initialization
pub use logging::init_logging;
