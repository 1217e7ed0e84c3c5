use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::transport::ChannelTransport;

use super::entry::ChannelEntry;
use super::types::{ChannelEvent, ChannelId, ChannelSnapshot, ChannelState};

/// Outcome of one sweep pass, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Channels that changed state (stale or disconnected transitions).
    pub transitions: usize,
    /// Zero-subscriber entries removed after their grace period.
    pub removed: usize,
}

/// Single source of truth for "is channel X alive".
///
/// Owns the map of per-channel liveness machines and the transport calls
/// that accompany entry creation, removal, and reconnection. All mutation
/// funnels through the methods here; no other component touches entries
/// directly.
pub struct ChannelRegistry {
    channels: HashMap<ChannelId, ChannelEntry>,
    transport: Arc<dyn ChannelTransport>,
    stale_threshold: Duration,
    disconnect_threshold: Duration,
    release_grace: Duration,
}

impl ChannelRegistry {
    pub fn new(transport: Arc<dyn ChannelTransport>, config: &beacon_config::ChannelConfig) -> Self {
        Self {
            channels: HashMap::new(),
            transport,
            stale_threshold: config.stale_threshold(),
            disconnect_threshold: config.disconnect_threshold(),
            release_grace: config.release_grace(),
        }
    }

    /// Register a subscriber for `id`.
    ///
    /// The first subscriber creates the entry in connecting state and opens
    /// the transport; later subscribers share the existing entry. A
    /// subscriber arriving during the release grace window cancels the
    /// pending removal and reuses the still-open transport.
    ///
    /// Returns `true` when this call created the entry.
    pub fn register(&mut self, id: &ChannelId, now: Instant) -> bool {
        if let Some(entry) = self.channels.get_mut(id) {
            entry.retain();
            debug!(
                event = "sync.channel.subscriber_joined",
                channel_id = %id,
                subscribers = entry.subscribers(),
            );
            return false;
        }

        self.channels.insert(id.clone(), ChannelEntry::new(now));
        info!(event = "sync.channel.registered", channel_id = %id);
        self.transport.open(id);
        true
    }

    /// Record a liveness signal for `id`.
    pub fn heartbeat(&mut self, id: &ChannelId, now: Instant) {
        self.apply_event(id, ChannelEvent::Heartbeat, now);
    }

    /// Record a transport error for `id`. Transitions to disconnected
    /// immediately; a hard failure always takes precedence over timers.
    pub fn mark_error(&mut self, id: &ChannelId, now: Instant) {
        self.apply_event(id, ChannelEvent::TransportError, now);
    }

    /// Record a transport close for `id`. Same immediate-disconnect rule as
    /// [`Self::mark_error`].
    pub fn mark_closed(&mut self, id: &ChannelId, now: Instant) {
        self.apply_event(id, ChannelEvent::TransportClosed, now);
    }

    /// Release one subscriber for `id`. At zero the entry survives a grace
    /// period (armed here, enforced by the sweep) so rapid remounts during
    /// navigation reuse the open transport.
    pub fn release(&mut self, id: &ChannelId, now: Instant) {
        let Some(entry) = self.channels.get_mut(id) else {
            warn!(event = "sync.channel.release_unknown", channel_id = %id);
            return;
        };
        let remaining = entry.release(now, self.release_grace);
        debug!(
            event = "sync.channel.subscriber_released",
            channel_id = %id,
            subscribers = remaining,
        );
    }

    /// Close and reopen the transport for every registered channel, forcing
    /// each entry back to connecting. Returns the number of cycled channels.
    pub fn force_reconnect_all(&mut self, now: Instant) -> usize {
        let mut cycled = 0;
        for (id, entry) in &mut self.channels {
            self.transport.close(id);
            self.transport.open(id);
            entry.apply(ChannelEvent::ReconnectRequested, now);
            cycled += 1;
        }
        info!(event = "sync.channel.reconnect_cycled", count = cycled);
        cycled
    }

    /// One sweep pass: staleness/disconnect transitions for every live
    /// entry, then removal of entries whose release grace expired.
    pub fn sweep(&mut self, now: Instant) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();

        for (id, entry) in &mut self.channels {
            if let Some(next) = entry.sweep(now, self.stale_threshold, self.disconnect_threshold) {
                info!(
                    event = "sync.channel.liveness_transition",
                    channel_id = %id,
                    state = %next,
                );
                outcome.transitions += 1;
            }
        }

        let expired: Vec<ChannelId> = self
            .channels
            .iter()
            .filter(|(_, entry)| entry.expired(now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            self.channels.remove(&id);
            self.transport.close(&id);
            info!(event = "sync.channel.removed", channel_id = %id);
            outcome.removed += 1;
        }

        outcome
    }

    /// Close every transport and drop all entries (process/tab teardown).
    pub fn close_all(&mut self) {
        for id in self.channels.keys() {
            self.transport.close(id);
        }
        let count = self.channels.len();
        self.channels.clear();
        info!(event = "sync.channel.closed_all", count = count);
    }

    pub fn state_of(&self, id: &ChannelId) -> Option<ChannelState> {
        self.channels.get(id).map(|entry| entry.state())
    }

    /// Current states of all registered channels, for status derivation.
    pub fn states(&self) -> Vec<ChannelState> {
        self.channels.values().map(|entry| entry.state()).collect()
    }

    /// Ids of all registered channels.
    pub fn ids(&self) -> Vec<ChannelId> {
        self.channels.keys().cloned().collect()
    }

    /// Per-channel diagnostics view.
    pub fn snapshot(&self, now: Instant) -> Vec<ChannelSnapshot> {
        let mut snapshots: Vec<ChannelSnapshot> = self
            .channels
            .iter()
            .map(|(id, entry)| ChannelSnapshot {
                id: id.clone(),
                state: entry.state(),
                subscribers: entry.subscribers(),
                seconds_since_heartbeat: entry.seconds_since_heartbeat(now),
            })
            .collect();
        snapshots.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        snapshots
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Apply one transport event to one entry. Events against an unknown id
    /// (a released channel's late callbacks) are logged no-ops; failures
    /// are local and never propagate to the caller.
    fn apply_event(&mut self, id: &ChannelId, event: ChannelEvent, now: Instant) {
        let Some(entry) = self.channels.get_mut(id) else {
            debug!(
                event = "sync.channel.event_for_unknown",
                channel_id = %id,
                channel_event = ?event,
            );
            return;
        };
        if let Some(next) = entry.apply(event, now) {
            info!(
                event = "sync.channel.state_changed",
                channel_id = %id,
                state = %next,
                channel_event = ?event,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{RecordingTransport, TransportCall};

    fn test_config() -> beacon_config::ChannelConfig {
        beacon_config::ChannelConfig {
            stale_threshold_ms: Some(15_000),
            disconnect_threshold_ms: Some(45_000),
            sweep_interval_ms: Some(1_000),
            release_grace_ms: Some(3_000),
        }
    }

    fn test_registry() -> (ChannelRegistry, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let registry = ChannelRegistry::new(transport.clone(), &test_config());
        (registry, transport)
    }

    #[test]
    fn test_first_register_opens_transport() {
        let (mut registry, transport) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        assert!(registry.register(&id, now));
        assert_eq!(registry.state_of(&id), Some(ChannelState::Connecting));
        assert_eq!(transport.opens_for(&id), 1);
    }

    #[test]
    fn test_second_register_reuses_entry() {
        let (mut registry, transport) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        registry.register(&id, now);
        assert!(!registry.register(&id, now));
        assert_eq!(registry.len(), 1);
        assert_eq!(transport.opens_for(&id), 1);
    }

    #[test]
    fn test_heartbeat_connects_channel() {
        let (mut registry, _) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        registry.register(&id, now);
        registry.heartbeat(&id, now);
        assert_eq!(registry.state_of(&id), Some(ChannelState::Connected));
    }

    #[test]
    fn test_mark_error_and_closed_disconnect_immediately() {
        let (mut registry, _) = test_registry();
        let a: ChannelId = "a".into();
        let b: ChannelId = "b".into();
        let now = Instant::now();

        registry.register(&a, now);
        registry.register(&b, now);
        registry.heartbeat(&a, now);
        registry.heartbeat(&b, now);

        registry.mark_error(&a, now);
        registry.mark_closed(&b, now);
        assert_eq!(registry.state_of(&a), Some(ChannelState::Disconnected));
        assert_eq!(registry.state_of(&b), Some(ChannelState::Disconnected));
    }

    #[test]
    fn test_event_for_unknown_channel_is_noop() {
        let (mut registry, _) = test_registry();
        let id: ChannelId = "ghost".into();
        let now = Instant::now();

        // None of these may panic or create entries.
        registry.heartbeat(&id, now);
        registry.mark_error(&id, now);
        registry.mark_closed(&id, now);
        registry.release(&id, now);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sweep_walks_stale_then_disconnected() {
        let (mut registry, _) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        registry.register(&id, now);
        registry.heartbeat(&id, now);

        let outcome = registry.sweep(now + Duration::from_secs(15));
        assert_eq!(outcome.transitions, 1);
        assert_eq!(registry.state_of(&id), Some(ChannelState::Stale));

        let outcome = registry.sweep(now + Duration::from_secs(15 + 45));
        assert_eq!(outcome.transitions, 1);
        assert_eq!(registry.state_of(&id), Some(ChannelState::Disconnected));
    }

    #[test]
    fn test_release_keeps_entry_through_grace_window() {
        let (mut registry, transport) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        registry.register(&id, now);
        registry.release(&id, now);

        // Entry survives until the grace deadline passes.
        let outcome = registry.sweep(now + Duration::from_secs(2));
        assert_eq!(outcome.removed, 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(transport.closes_for(&id), 0);

        let outcome = registry.sweep(now + Duration::from_secs(3));
        assert_eq!(outcome.removed, 1);
        assert!(registry.is_empty());
        assert_eq!(transport.closes_for(&id), 1);
    }

    #[test]
    fn test_remount_during_grace_reuses_open_transport() {
        let (mut registry, transport) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        registry.register(&id, now);
        registry.release(&id, now);
        registry.register(&id, now + Duration::from_secs(1));

        let outcome = registry.sweep(now + Duration::from_secs(10));
        assert_eq!(outcome.removed, 0);
        assert_eq!(registry.len(), 1);
        // One open for the original mount, no close, no second open.
        assert_eq!(transport.opens_for(&id), 1);
        assert_eq!(transport.closes_for(&id), 0);
    }

    #[test]
    fn test_force_reconnect_all_cycles_every_channel() {
        let (mut registry, transport) = test_registry();
        let a: ChannelId = "a".into();
        let b: ChannelId = "b".into();
        let now = Instant::now();

        registry.register(&a, now);
        registry.register(&b, now);
        registry.heartbeat(&a, now);
        registry.mark_error(&b, now);

        assert_eq!(registry.force_reconnect_all(now), 2);
        assert_eq!(registry.state_of(&a), Some(ChannelState::Connecting));
        assert_eq!(registry.state_of(&b), Some(ChannelState::Connecting));
        assert_eq!(transport.closes_for(&a), 1);
        assert_eq!(transport.opens_for(&a), 2);
        assert_eq!(transport.closes_for(&b), 1);
        assert_eq!(transport.opens_for(&b), 2);
    }

    #[test]
    fn test_close_all_tears_down_every_channel() {
        let (mut registry, transport) = test_registry();
        let a: ChannelId = "a".into();
        let b: ChannelId = "b".into();
        let now = Instant::now();

        registry.register(&a, now);
        registry.register(&b, now);
        registry.close_all();

        assert!(registry.is_empty());
        assert_eq!(transport.closes_for(&a), 1);
        assert_eq!(transport.closes_for(&b), 1);
    }

    #[test]
    fn test_snapshot_is_sorted_and_complete() {
        let (mut registry, _) = test_registry();
        let now = Instant::now();
        registry.register(&"b".into(), now);
        registry.register(&"a".into(), now);
        registry.heartbeat(&"a".into(), now);

        let snapshots = registry.snapshot(now + Duration::from_secs(5));
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].id.as_str(), "a");
        assert_eq!(snapshots[0].state, ChannelState::Connected);
        assert_eq!(snapshots[0].seconds_since_heartbeat, 5);
        assert_eq!(snapshots[1].id.as_str(), "b");
        assert_eq!(snapshots[1].state, ChannelState::Connecting);
    }

    #[test]
    fn test_late_callbacks_after_removal_are_ignored() {
        let (mut registry, transport) = test_registry();
        let id: ChannelId = "runs/1".into();
        let now = Instant::now();

        registry.register(&id, now);
        registry.release(&id, now);
        registry.sweep(now + Duration::from_secs(3));
        assert!(registry.is_empty());

        // Cancellation semantics: callbacks for the removed entry no-op.
        registry.heartbeat(&id, now + Duration::from_secs(4));
        registry.mark_error(&id, now + Duration::from_secs(4));
        assert!(registry.is_empty());
        assert_eq!(transport.opens_for(&id), 1);
    }
}
