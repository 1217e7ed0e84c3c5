//! Integration tests for the full synchronization layer.
//!
//! These tests start a real `SyncHub` with a recording transport and a
//! static probe, then drive it through subscribe/heartbeat/failure/
//! reconnect cycles the way a dashboard session would, with the paused
//! Tokio clock standing in for wall time.

use std::sync::Arc;
use std::time::Duration;

use beacon_config::BeaconConfig;
use beacon_sync::{
    ChannelState, CombinedStatus, HealthSnapshot, RecordingTransport, StaticProbe, SyncHub,
    collection_interval, dependent_interval, entity_interval, PollInterval, PollingPolicy,
};

fn test_config() -> BeaconConfig {
    let mut config = BeaconConfig::default();
    // Manual reconnection only; auto-reconnect has its own test below.
    config.reconnect.auto = Some(false);
    config
}

fn start_hub(config: &BeaconConfig, probe: HealthSnapshot) -> (SyncHub, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let hub = SyncHub::start(config, transport.clone(), Arc::new(StaticProbe::new(probe)));
    (hub, transport)
}

/// Let woken background tasks run after a time advance.
async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_session_lifecycle() {
    let (hub, transport) = start_hub(&test_config(), HealthSnapshot::healthy());

    // Dashboard mounts: run list channel plus one run detail channel.
    let runs = hub.subscribe("runs");
    let detail = hub.subscribe("runs/42");
    assert_eq!(hub.status(), CombinedStatus::Connecting);

    // Both channels start delivering.
    hub.heartbeat(runs.id());
    hub.heartbeat(detail.id());
    assert_eq!(hub.status(), CombinedStatus::Connected);

    // The detail view unmounts; its channel survives the grace window,
    // then is torn down.
    let detail_id = detail.id().clone();
    drop(detail);
    tokio::time::advance(Duration::from_secs(4)).await;
    settle().await;
    assert_eq!(hub.active_channel_ids(), vec![runs.id().clone()]);
    assert_eq!(transport.closes_for(&detail_id), 1);

    // The remaining channel keeps the indicator green as long as
    // heartbeats keep arriving.
    hub.heartbeat(runs.id());
    assert_eq!(hub.status(), CombinedStatus::Connected);

    hub.shutdown();
    assert!(hub.active_channel_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_silent_channel_degrades_and_manual_reconnect_recovers() {
    let (hub, transport) = start_hub(&test_config(), HealthSnapshot::healthy());
    let handle = hub.subscribe("runs");
    hub.heartbeat(handle.id());

    // Stream goes quiet: stale after 15s, disconnected 45s later.
    tokio::time::advance(Duration::from_secs(15)).await;
    settle().await;
    assert_eq!(hub.status(), CombinedStatus::Stale);

    tokio::time::advance(Duration::from_secs(45)).await;
    settle().await;
    assert_eq!(hub.status(), CombinedStatus::Disconnected);

    // User clicks reconnect: exactly one close/reopen cycle even if the
    // button is mashed.
    assert!(hub.reconnect_all());
    assert!(!hub.reconnect_all());
    assert!(!hub.reconnect_all());
    assert_eq!(transport.opens_for(handle.id()), 2);
    assert_eq!(transport.closes_for(handle.id()), 1);
    assert_eq!(hub.status(), CombinedStatus::Connecting);

    // The reopened stream delivers again.
    hub.heartbeat(handle.id());
    tokio::time::advance(Duration::from_secs(3)).await;
    settle().await;
    assert_eq!(hub.status(), CombinedStatus::Connected);
}

#[tokio::test(start_paused = true)]
async fn test_auto_reconnect_recovers_without_user_action() {
    let config = BeaconConfig::default(); // auto-reconnect on by default
    let (hub, transport) = start_hub(&config, HealthSnapshot::healthy());
    let handle = hub.subscribe("runs");
    hub.heartbeat(handle.id());

    hub.mark_error(handle.id());
    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;

    assert_eq!(handle.state(), ChannelState::Connecting);
    assert_eq!(transport.opens_for(handle.id()), 2);

    // Only one cycle despite repeated disconnected sweeps inside the
    // cooldown window.
    hub.mark_error(handle.id());
    tokio::time::advance(Duration::from_millis(500)).await;
    settle().await;
    assert_eq!(transport.opens_for(handle.id()), 2);
}

#[tokio::test(start_paused = true)]
async fn test_degraded_gateway_still_tracks_channel_liveness() {
    let (hub, _) = start_hub(&test_config(), HealthSnapshot::failing());
    let handle = hub.subscribe("runs");
    hub.heartbeat(handle.id());

    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;

    // Indicator shows the gateway problem, but channel bookkeeping
    // continues underneath.
    assert_eq!(hub.status(), CombinedStatus::Degraded);
    assert_eq!(handle.state(), ChannelState::Connected);

    // Manual reconnection stays available while degraded.
    assert!(hub.reconnect_all());
    assert_eq!(handle.state(), ChannelState::Connecting);
}

#[tokio::test]
async fn test_status_watch_follows_a_failure_and_recovery() {
    let (hub, _) = start_hub(&test_config(), HealthSnapshot::healthy());
    let mut watch = hub.status_watch();
    assert_eq!(*watch.borrow_and_update(), CombinedStatus::Connected);

    let handle = hub.subscribe("runs");
    watch.changed().await.unwrap();
    assert_eq!(*watch.borrow_and_update(), CombinedStatus::Connecting);

    hub.heartbeat(handle.id());
    watch.changed().await.unwrap();
    assert_eq!(*watch.borrow_and_update(), CombinedStatus::Connected);

    hub.mark_closed(handle.id());
    watch.changed().await.unwrap();
    assert_eq!(*watch.borrow_and_update(), CombinedStatus::Disconnected);
}

struct Run {
    status: &'static str,
}

impl beacon_sync::LifecycleStatus for Run {
    fn lifecycle_status(&self) -> &str {
        self.status
    }
}

#[tokio::test]
async fn test_polling_composes_with_config_policy() {
    let config: BeaconConfig = toml::from_str(
        r#"
        [polling]
        active_ms = 1000
        medium_ms = 5000
        background_ms = 20000
        long_ms = 60000
        "#,
    )
    .unwrap();
    let policy = PollingPolicy::from_config(&config.polling);

    // Run list: one in-flight run keeps the list hot.
    let runs = vec![Run { status: "completed" }, Run { status: "running" }];
    assert_eq!(
        collection_interval(Some(&runs), &policy),
        PollInterval::Every(Duration::from_secs(1))
    );

    // Run detail settles to the background tier once terminal.
    let done = Run { status: "failed" };
    assert_eq!(
        entity_interval(Some(&done), &policy),
        PollInterval::Every(Duration::from_secs(20))
    );

    // Child records stop polling entirely once the parent run finished,
    // regardless of their own payload.
    assert_eq!(
        dependent_interval(Some("running"), &policy),
        PollInterval::Every(Duration::from_secs(1))
    );
    assert_eq!(
        dependent_interval(Some("completed"), &policy),
        PollInterval::Disabled
    );
}
