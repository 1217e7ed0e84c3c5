//! Reconnect-all storm prevention.
//!
//! The controller decides whether a reconnect cycle may start and owns the
//! `reconnecting` flag plus its cooldown deadline. It never performs
//! transport work itself; the hub cycles the registry's transports when a
//! cycle is approved. Cooldown expiry is observed by the periodic sweep
//! rather than a dedicated timer, so all timing flows through one tick.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::status::CombinedStatus;

pub(crate) struct ReconnectController {
    cooldown: Duration,
    reconnecting: bool,
    cooldown_until: Option<Instant>,
}

impl ReconnectController {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            reconnecting: false,
            cooldown_until: None,
        }
    }

    pub fn reconnecting(&self) -> bool {
        self.reconnecting
    }

    /// Decide whether a new reconnect cycle starts now.
    ///
    /// Refused while a cooldown is active (concurrent callers coalesce into
    /// the in-flight attempt) or when `status` does not permit
    /// reconnection. On approval the flag is raised and the cooldown armed.
    pub fn try_begin(&mut self, status: CombinedStatus, now: Instant) -> bool {
        if let Some(until) = self.cooldown_until
            && now < until
        {
            debug!(event = "sync.reconnect.coalesced", status = %status);
            return false;
        }
        if !status.permits_reconnect() {
            debug!(event = "sync.reconnect.not_permitted", status = %status);
            return false;
        }

        self.reconnecting = true;
        self.cooldown_until = Some(now + self.cooldown);
        info!(event = "sync.reconnect.started", status = %status);
        true
    }

    /// Sweep hook: lower the flag once the cooldown has passed.
    /// Returns `true` if the flag was cleared on this call.
    pub fn expire(&mut self, now: Instant) -> bool {
        if !self.reconnecting {
            return false;
        }
        if self.cooldown_until.is_some_and(|until| now >= until) {
            self.reconnecting = false;
            self.cooldown_until = None;
            info!(event = "sync.reconnect.cooldown_expired");
            return true;
        }
        false
    }
}
