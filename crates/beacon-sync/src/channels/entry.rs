use std::time::Duration;

use tokio::time::Instant;

use super::types::{ChannelEvent, ChannelState};

/// Liveness bookkeeping for one subscribed channel.
///
/// A pure state machine over [`ChannelEvent`]s and sweep observations; owns
/// no I/O and does no logging. The registry layers transport calls and
/// structured logging on top, which keeps every transition rule testable in
/// isolation.
#[derive(Debug)]
pub(crate) struct ChannelEntry {
    state: ChannelState,
    subscribers: usize,
    last_heartbeat_at: Instant,
    last_transition_at: Instant,
    /// Set when the last subscriber releases; the sweep removes the entry
    /// once this deadline passes. Cleared by re-registration.
    removal_deadline: Option<Instant>,
}

impl ChannelEntry {
    /// Create an entry for its first subscriber, in connecting state.
    pub fn new(now: Instant) -> Self {
        Self {
            state: ChannelState::Connecting,
            subscribers: 1,
            last_heartbeat_at: now,
            last_transition_at: now,
            removal_deadline: None,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn subscribers(&self) -> usize {
        self.subscribers
    }

    pub fn seconds_since_heartbeat(&self, now: Instant) -> u64 {
        now.duration_since(self.last_heartbeat_at).as_secs()
    }

    /// Apply one transport event. Returns the new state if it changed.
    ///
    /// One transition rule per event variant:
    /// - `Heartbeat` always refreshes `last_heartbeat_at` and recovers any
    ///   non-connected state to connected.
    /// - `TransportError` / `TransportClosed` force disconnected
    ///   immediately; a hard failure beats every timer. Idempotent.
    /// - `ReconnectRequested` forces connecting from any state.
    pub fn apply(&mut self, event: ChannelEvent, now: Instant) -> Option<ChannelState> {
        match event {
            ChannelEvent::Heartbeat => {
                self.last_heartbeat_at = now;
                if self.state == ChannelState::Connected {
                    None
                } else {
                    Some(self.transition(ChannelState::Connected, now))
                }
            }
            ChannelEvent::TransportError | ChannelEvent::TransportClosed => {
                if self.state == ChannelState::Disconnected {
                    None
                } else {
                    Some(self.transition(ChannelState::Disconnected, now))
                }
            }
            ChannelEvent::ReconnectRequested => {
                if self.state == ChannelState::Connecting {
                    None
                } else {
                    Some(self.transition(ChannelState::Connecting, now))
                }
            }
        }
    }

    /// One sweep observation: connected channels go stale after
    /// `stale_threshold` of silence; stale channels go disconnected after a
    /// further `disconnect_threshold` without recovery.
    pub fn sweep(
        &mut self,
        now: Instant,
        stale_threshold: Duration,
        disconnect_threshold: Duration,
    ) -> Option<ChannelState> {
        match self.state {
            ChannelState::Connected
                if now.duration_since(self.last_heartbeat_at) >= stale_threshold =>
            {
                Some(self.transition(ChannelState::Stale, now))
            }
            ChannelState::Stale
                if now.duration_since(self.last_transition_at) >= disconnect_threshold =>
            {
                Some(self.transition(ChannelState::Disconnected, now))
            }
            _ => None,
        }
    }

    /// Add a subscriber, cancelling any pending removal.
    pub fn retain(&mut self) {
        self.subscribers += 1;
        self.removal_deadline = None;
    }

    /// Remove a subscriber. At zero the removal deadline is armed; the entry
    /// (and its transport) survives until the grace period expires.
    /// Returns the remaining subscriber count.
    pub fn release(&mut self, now: Instant, grace: Duration) -> usize {
        self.subscribers = self.subscribers.saturating_sub(1);
        if self.subscribers == 0 {
            self.removal_deadline = Some(now + grace);
        }
        self.subscribers
    }

    /// Whether the sweep should remove this entry.
    pub fn expired(&self, now: Instant) -> bool {
        self.subscribers == 0 && self.removal_deadline.is_some_and(|deadline| now >= deadline)
    }

    fn transition(&mut self, next: ChannelState, now: Instant) -> ChannelState {
        self.state = next;
        self.last_transition_at = now;
        next
    }
}
