//! Contract Test: Scheduler Timing and Serialization
//!
//! Verifies that:
//! - Ticks inside the refresh interval make no network calls
//! - The first tick after start runs an attempt
//! - A force request is consumed on the scheduler's own next tick
//! - The "please configure" notice is shown once, at start
//! - Settings are re-read every tick
//! - Attempts never overlap, even when forced during a slow attempt

mod common;

use common::*;
use duckdns_core::{
    AttemptOutcome, Configuration, Error, MemorySettings, RefreshInterval, SettingsSource,
    UpdateResult,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn alice() -> Configuration {
    Configuration::new("alice", "tok123")
}

#[tokio::test]
async fn ticks_within_interval_make_no_network_calls() {
    let harness = Harness::new("1.2.3.4", "1.2.3.4", UpdateResult::Accepted);
    let mut scheduler = harness.scheduler(MemorySettings::new(alice()));
    scheduler.start().await;

    // Primed at start: first tick runs an attempt
    let first = scheduler.tick().await.expect("first tick runs an attempt");
    assert_eq!(first.outcome, AttemptOutcome::Unchanged);
    let calls_after_first = harness.network_calls();
    assert_eq!(calls_after_first, 2);

    for second in 1..=300 {
        assert!(scheduler.tick().await.is_none(), "tick {} ran an attempt", second);
        assert_eq!(scheduler.engine().state().elapsed_seconds, second);
    }
    assert_eq!(harness.network_calls(), calls_after_first);

    // 301 > 300
    assert!(scheduler.tick().await.is_some());
    assert_eq!(scheduler.engine().state().elapsed_seconds, 0);
}

#[tokio::test]
async fn interval_follows_settings() {
    let harness = Harness::new("1.2.3.4", "1.2.3.4", UpdateResult::Accepted);
    let settings =
        MemorySettings::new(alice().with_refresh_interval(RefreshInterval::TenMinutes));
    let mut scheduler = harness.scheduler(settings);
    scheduler.start().await;
    scheduler.tick().await.expect("first attempt");

    let mut attempts = 0;
    for _ in 0..601 {
        if scheduler.tick().await.is_some() {
            attempts += 1;
        }
    }

    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn force_runs_attempt_on_next_tick() {
    let harness = Harness::new("5.6.7.8", "1.2.3.4", UpdateResult::Accepted);
    let mut scheduler = harness.scheduler(MemorySettings::new(alice()));
    scheduler.start().await;
    scheduler.tick().await.expect("first attempt");
    assert_eq!(harness.client.call_count(), 1);

    for _ in 0..10 {
        scheduler.tick().await;
    }

    let handle = scheduler.force_handle();
    handle.force();
    assert!(handle.is_pending());
    // Nothing happens until the scheduler ticks
    assert_eq!(harness.client.call_count(), 1);

    let status_updates_before = harness.status.texts().len();
    let report = scheduler.tick().await.expect("forced attempt");

    assert_eq!(report.outcome, AttemptOutcome::Updated);
    assert_eq!(harness.client.call_count(), 2);
    assert!(!handle.is_pending());
    // Countdown refresh on force, then the attempt's own status text
    assert_eq!(harness.status.texts().len(), status_updates_before + 2);
}

#[tokio::test]
async fn unconfigured_notifies_once_and_stays_offline() {
    let harness = Harness::new("1.2.3.4", "5.6.7.8", UpdateResult::Accepted);
    let mut scheduler = harness.scheduler(MemorySettings::default());
    scheduler.start().await;

    assert_eq!(harness.notifier.count(), 1);
    assert!(harness.notifier.notifications()[0].body.contains("configure"));

    let mut outcomes = Vec::new();
    for _ in 0..700 {
        if let Some(report) = scheduler.tick().await {
            outcomes.push(report.outcome);
        }
    }

    assert_eq!(outcomes, vec![AttemptOutcome::NotYetRun; 3]);
    assert_eq!(harness.notifier.count(), 1);
    assert_eq!(harness.network_calls(), 0);
}

#[tokio::test]
async fn new_credentials_trigger_immediate_attempt() {
    let harness = Harness::new("5.6.7.8", "1.2.3.4", UpdateResult::Accepted);
    let settings = MemorySettings::default();
    let mut scheduler = harness.scheduler(settings.clone());
    scheduler.start().await;
    scheduler.tick().await;

    for _ in 0..5 {
        assert!(scheduler.tick().await.is_none());
    }

    settings.replace(alice()).await;

    let report = scheduler.tick().await.expect("attempt after settings change");
    assert_eq!(report.outcome, AttemptOutcome::Updated);
    assert_eq!(scheduler.config().domain, "alice");

    // Changing only the interval does not force anything
    settings
        .replace(alice().with_refresh_interval(RefreshInterval::SixtyMinutes))
        .await;
    assert!(scheduler.tick().await.is_none());
}

/// Settings source that starts failing on demand
#[derive(Clone)]
struct FlakySettings {
    inner: MemorySettings,
    failing: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl SettingsSource for FlakySettings {
    async fn load(&self) -> duckdns_core::Result<Configuration> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::config("settings file unreadable"));
        }
        self.inner.load().await
    }
}

#[tokio::test]
async fn failed_settings_load_keeps_previous_configuration() {
    let harness = Harness::new("1.2.3.4", "1.2.3.4", UpdateResult::Accepted);
    let settings = FlakySettings {
        inner: MemorySettings::new(alice()),
        failing: Arc::new(AtomicBool::new(false)),
    };
    let mut scheduler = harness.scheduler(settings.clone());
    scheduler.start().await;
    scheduler.tick().await.expect("first attempt");

    settings.failing.store(true, Ordering::SeqCst);
    scheduler.force_handle().force();

    let report = scheduler.tick().await.expect("forced attempt");
    assert_eq!(report.outcome, AttemptOutcome::Unchanged);
    assert_eq!(scheduler.config().domain, "alice");
}

#[tokio::test]
async fn forced_attempts_never_overlap() {
    let mut harness = Harness::new("5.6.7.8", "1.2.3.4", UpdateResult::Accepted);
    harness.client = harness.client.clone().with_delay(Duration::from_millis(100));

    let scheduler = harness
        .scheduler(MemorySettings::new(alice()))
        .with_tick_period(Duration::from_millis(5));
    let force = scheduler.force_handle();
    let snapshot = scheduler.snapshot();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(scheduler.run_with_shutdown(Some(shutdown_rx)));

    // Hammer the force signal from another task
    let forcer = tokio::spawn(async move {
        for _ in 0..50 {
            force.force();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });
    forcer.await.unwrap();

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler stops within 5 seconds")
        .unwrap();

    assert!(harness.client.call_count() >= 2);
    assert_eq!(harness.client.max_in_flight(), 1);
    assert_eq!(
        snapshot.current().last_attempt_outcome,
        AttemptOutcome::Updated
    );
}

#[tokio::test]
async fn snapshot_stream_reports_attempts() {
    use tokio_stream::StreamExt;

    let harness = Harness::new("5.6.7.8", "1.2.3.4", UpdateResult::Accepted);
    let mut scheduler = harness.scheduler(MemorySettings::new(alice()));
    let mut changes = scheduler.snapshot().changes();

    let initial = changes.next().await.expect("initial snapshot");
    assert_eq!(initial.last_attempt_outcome, AttemptOutcome::NotYetRun);

    scheduler.start().await;
    scheduler.tick().await.expect("first attempt");

    let latest = changes.next().await.expect("snapshot after attempt");
    assert_eq!(latest.last_attempt_outcome, AttemptOutcome::Updated);
    assert_eq!(latest.last_known_ip, "5.6.7.8");
}
