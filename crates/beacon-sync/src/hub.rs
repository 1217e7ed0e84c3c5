//! The `SyncHub` facade: what UI components actually talk to.
//!
//! Owns the channel registry and the reconnection controller behind locks,
//! samples the health probe, runs the periodic sweep, and publishes the
//! derived [`CombinedStatus`] through a `tokio::sync::watch` channel.
//! Registry mutation happens only through the methods here; the watch
//! channel is the change-notification surface, while [`SyncHub::status`]
//! always recomputes from the current inputs.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use beacon_config::BeaconConfig;

use crate::channels::{ChannelId, ChannelRegistry, ChannelSnapshot, ChannelState};
use crate::health::{HealthProbe, HealthSnapshot};
use crate::reconnect::ReconnectController;
use crate::status::{CombinedStatus, StatusSummary, derive_status, summarize};
use crate::transport::ChannelTransport;

/// Entry point to the synchronization layer.
///
/// Cheap to clone; all clones share the same state. Must be created inside
/// a Tokio runtime - `start` spawns the sweep task.
#[derive(Clone)]
pub struct SyncHub {
    shared: Arc<HubShared>,
}

struct HubShared {
    registry: Mutex<ChannelRegistry>,
    reconnect: Mutex<ReconnectController>,
    health: Mutex<HealthSnapshot>,
    probe: Arc<dyn HealthProbe>,
    status_tx: watch::Sender<CombinedStatus>,
    shutdown: CancellationToken,
    auto_reconnect: bool,
}

impl SyncHub {
    /// Build the hub and spawn its sweep loop.
    ///
    /// The registry starts empty; with a healthy probe and no channels the
    /// published status is `connected` (bare gateway health).
    pub fn start(
        config: &BeaconConfig,
        transport: Arc<dyn ChannelTransport>,
        probe: Arc<dyn HealthProbe>,
    ) -> Self {
        let initial_health = probe.snapshot();
        let initial_status = derive_status(initial_health, false, &[]);
        let (status_tx, _) = watch::channel(initial_status);

        let shared = Arc::new(HubShared {
            registry: Mutex::new(ChannelRegistry::new(transport, &config.channels)),
            reconnect: Mutex::new(ReconnectController::new(config.reconnect.cooldown())),
            health: Mutex::new(initial_health),
            probe,
            status_tx,
            shutdown: CancellationToken::new(),
            auto_reconnect: config.reconnect.auto_reconnect(),
        });

        info!(
            event = "sync.hub.started",
            sweep_interval_ms = config.channels.sweep_interval().as_millis() as u64,
            auto_reconnect = shared.auto_reconnect,
        );

        tokio::spawn(run_sweep(shared.clone(), config.channels.sweep_interval()));

        Self { shared }
    }

    /// Subscribe to a live-data channel.
    ///
    /// The first subscriber for an id opens the transport; later
    /// subscribers share the entry. The returned handle releases its
    /// subscription on drop (or explicitly via [`ChannelHandle::release`]).
    pub fn subscribe(&self, id: impl Into<ChannelId>) -> ChannelHandle {
        let id = id.into();
        let handle_id = Uuid::new_v4();
        let created = self.shared.lock_registry().register(&id, Instant::now());
        debug!(
            event = "sync.hub.handle_issued",
            channel_id = %id,
            handle_id = %handle_id,
            created = created,
        );
        self.shared.publish();
        ChannelHandle {
            id,
            handle_id,
            shared: Arc::downgrade(&self.shared),
            released: false,
        }
    }

    /// Record a data/keepalive event for `id`. Called by the transport
    /// integration on every delivery.
    pub fn heartbeat(&self, id: &ChannelId) {
        self.shared.lock_registry().heartbeat(id, Instant::now());
        self.shared.publish();
    }

    /// Record a transport error for `id`.
    pub fn mark_error(&self, id: &ChannelId) {
        self.shared.lock_registry().mark_error(id, Instant::now());
        self.shared.publish();
    }

    /// Record a transport close for `id`.
    pub fn mark_closed(&self, id: &ChannelId) {
        self.shared.lock_registry().mark_closed(id, Instant::now());
        self.shared.publish();
    }

    /// Force every registered channel to close and reopen.
    ///
    /// No-op while the combined status does not permit reconnection or a
    /// cooldown from a previous cycle is active; concurrent calls coalesce
    /// into the in-flight attempt. Never fails - transport problems surface
    /// later as ordinary [`Self::mark_error`] events.
    ///
    /// Returns `true` when a new cycle actually started.
    pub fn reconnect_all(&self) -> bool {
        let now = Instant::now();
        let status = self.shared.current_status();
        let started = self.shared.begin_reconnect(status, now, "manual");
        self.shared.publish();
        started
    }

    /// Current combined status, recomputed from the live inputs.
    pub fn status(&self) -> CombinedStatus {
        self.shared.current_status()
    }

    /// Change-notification stream for the combined status. The receiver
    /// holds the latest published value; it only wakes when the value
    /// actually changes.
    pub fn status_watch(&self) -> watch::Receiver<CombinedStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Per-state channel counts for the diagnostics pane.
    pub fn summary(&self) -> StatusSummary {
        summarize(&self.shared.lock_registry().states())
    }

    /// Ids of all currently registered channels.
    pub fn active_channel_ids(&self) -> Vec<ChannelId> {
        self.shared.lock_registry().ids()
    }

    /// Liveness state of one channel, if registered.
    pub fn channel_state(&self, id: &ChannelId) -> Option<ChannelState> {
        self.shared.lock_registry().state_of(id)
    }

    /// Per-channel diagnostics view.
    pub fn snapshot(&self) -> Vec<ChannelSnapshot> {
        self.shared.lock_registry().snapshot(Instant::now())
    }

    /// Whether a reconnect cycle is currently in flight.
    pub fn is_reconnecting(&self) -> bool {
        self.shared.lock_reconnect().reconnecting()
    }

    /// Tear down: stop the sweep and close every open transport.
    pub fn shutdown(&self) {
        info!(event = "sync.hub.shutdown_started");
        self.shared.shutdown.cancel();
        self.shared.lock_registry().close_all();
        self.shared.publish();
        info!(event = "sync.hub.shutdown_completed");
    }
}

impl HubShared {
    fn lock_registry(&self) -> MutexGuard<'_, ChannelRegistry> {
        match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!(event = "sync.hub.registry_lock_poisoned");
                poisoned.into_inner()
            }
        }
    }

    fn lock_reconnect(&self) -> MutexGuard<'_, ReconnectController> {
        match self.reconnect.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!(event = "sync.hub.reconnect_lock_poisoned");
                poisoned.into_inner()
            }
        }
    }

    fn lock_health(&self) -> MutexGuard<'_, HealthSnapshot> {
        match self.health.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!(event = "sync.hub.health_lock_poisoned");
                poisoned.into_inner()
            }
        }
    }

    /// Derive the combined status from the current inputs. Locks are taken
    /// one at a time and released before the next; no lock nesting anywhere
    /// in the hub.
    fn current_status(&self) -> CombinedStatus {
        let probe = *self.lock_health();
        let reconnecting = self.lock_reconnect().reconnecting();
        let states = self.lock_registry().states();
        derive_status(probe, reconnecting, &states)
    }

    /// Start a reconnect cycle if the controller approves.
    fn begin_reconnect(&self, status: CombinedStatus, now: Instant, trigger: &str) -> bool {
        if !self.lock_reconnect().try_begin(status, now) {
            return false;
        }
        info!(event = "sync.hub.reconnect_cycle", trigger = trigger);
        self.lock_registry().force_reconnect_all(now);
        true
    }

    /// Recompute and publish the combined status; observers wake only when
    /// the value changed.
    fn publish(&self) {
        let status = self.current_status();
        let changed = self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if changed {
            info!(event = "sync.status.changed", status = %status);
        }
    }

    /// One sweep tick: sample the probe, walk liveness timers, expire the
    /// reconnect cooldown, fire auto-reconnection, publish.
    fn sweep_once(&self, now: Instant) {
        *self.lock_health() = self.probe.snapshot();

        let outcome = self.lock_registry().sweep(now);
        if outcome.transitions > 0 || outcome.removed > 0 {
            debug!(
                event = "sync.hub.sweep_tick",
                transitions = outcome.transitions,
                removed = outcome.removed,
            );
        }

        self.lock_reconnect().expire(now);

        if self.auto_reconnect {
            let status = self.current_status();
            if status == CombinedStatus::Disconnected {
                self.begin_reconnect(status, now, "auto");
            }
        }

        self.publish();
    }
}

/// The periodic sweep: one timer services staleness, disconnect, release
/// grace, cooldown expiry, and probe sampling for every channel.
async fn run_sweep(shared: Arc<HubShared>, sweep_interval: Duration) {
    let mut ticker = tokio::time::interval(sweep_interval);
    // Coalesce ticks missed while the process was suspended.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                shared.sweep_once(Instant::now());
            }
            _ = shared.shutdown.cancelled() => {
                info!(event = "sync.hub.sweep_stopped");
                break;
            }
        }
    }
}

/// One subscription to one channel.
///
/// Holding the handle keeps the channel registered. Dropping it (or
/// calling [`Self::release`]) gives the subscription back; the underlying
/// transport survives a short grace period so a rapid remount reuses it.
pub struct ChannelHandle {
    id: ChannelId,
    handle_id: Uuid,
    shared: Weak<HubShared>,
    released: bool,
}

impl ChannelHandle {
    pub fn id(&self) -> &ChannelId {
        &self.id
    }

    /// Current liveness state of the subscribed channel.
    ///
    /// Reports disconnected when the hub is gone or the entry was already
    /// removed - a released channel has nothing live behind it.
    pub fn state(&self) -> ChannelState {
        self.shared
            .upgrade()
            .and_then(|shared| shared.lock_registry().state_of(&self.id))
            .unwrap_or(ChannelState::Disconnected)
    }

    /// Release this subscription explicitly. Equivalent to dropping.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(shared) = self.shared.upgrade() {
            debug!(
                event = "sync.hub.handle_released",
                channel_id = %self.id,
                handle_id = %self.handle_id,
            );
            shared.lock_registry().release(&self.id, Instant::now());
            shared.publish();
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.release_once();
    }
}
