//! Transport collaborator seam.
//!
//! The sync layer never speaks a wire protocol itself; it asks the
//! transport to open or close a named channel and receives liveness
//! signals back through [`crate::hub::SyncHub::heartbeat`],
//! [`crate::hub::SyncHub::mark_error`], and
//! [`crate::hub::SyncHub::mark_closed`]. Implementations must guarantee
//! that after `close` no further signals are delivered for that id.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::channels::ChannelId;

/// Server-push transport for live-data channels.
pub trait ChannelTransport: Send + Sync {
    /// Begin delivering heartbeat/data/error/close signals for `id`.
    fn open(&self, id: &ChannelId);

    /// Stop the stream for `id`. No further signals may arrive after this.
    fn close(&self, id: &ChannelId);
}

/// Transport that drops every request.
///
/// Useful for dashboards rendering purely from cached data, where channels
/// exist only so the status indicator has something to report.
pub struct NoopTransport;

impl ChannelTransport for NoopTransport {
    fn open(&self, id: &ChannelId) {
        debug!(event = "sync.transport.noop_open", channel_id = %id);
    }

    fn close(&self, id: &ChannelId) {
        debug!(event = "sync.transport.noop_close", channel_id = %id);
    }
}

/// One recorded transport request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Open(ChannelId),
    Close(ChannelId),
}

/// Test double recording open/close calls in order.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls_lock(&self) -> MutexGuard<'_, Vec<TransportCall>> {
        // A panic while holding the log lock only loses test bookkeeping.
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All calls observed so far, oldest first.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls_lock().clone()
    }

    /// Number of `open` calls recorded for `id`.
    pub fn opens_for(&self, id: &ChannelId) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, TransportCall::Open(open_id) if open_id == id))
            .count()
    }

    /// Number of `close` calls recorded for `id`.
    pub fn closes_for(&self, id: &ChannelId) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, TransportCall::Close(close_id) if close_id == id))
            .count()
    }
}

impl ChannelTransport for RecordingTransport {
    fn open(&self, id: &ChannelId) {
        self.calls_lock().push(TransportCall::Open(id.clone()));
    }

    fn close(&self, id: &ChannelId) {
        self.calls_lock().push(TransportCall::Close(id.clone()));
    }
}
