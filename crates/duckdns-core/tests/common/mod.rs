//! Test doubles and common utilities for contract tests
//!
//! Every double is cheap to clone and shares its counters between clones, so
//! a test can hand one clone to the engine and keep another for assertions.

#![allow(dead_code)]

use duckdns_core::traits::{
    HostnameResolver, IpResolver, Notification, Notifier, Severity, StatusSink, UpdateClient,
    UpdateResult,
};
use duckdns_core::{Error, ReconciliationEngine, Result, Scheduler, SettingsSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// IP resolver returning a settable address
#[derive(Clone, Default)]
pub struct MockIpResolver {
    ip: Arc<Mutex<String>>,
    calls: Arc<AtomicUsize>,
}

impl MockIpResolver {
    pub fn new(ip: &str) -> Self {
        let resolver = Self::default();
        resolver.set_ip(ip);
        resolver
    }

    pub fn set_ip(&self, ip: &str) {
        *self.ip.lock().unwrap() = ip.to_string();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for MockIpResolver {
    async fn resolve_current_ip(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ip.lock().unwrap().clone()
    }
}

/// Hostname resolver answering with a settable address, or failing
#[derive(Clone, Default)]
pub struct MockHostnameResolver {
    /// `None` makes the lookup fail
    answer: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
    domains: Arc<Mutex<Vec<String>>>,
}

impl MockHostnameResolver {
    pub fn new(ip: &str) -> Self {
        let resolver = Self::default();
        resolver.set_ip(ip);
        resolver
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set_ip(&self, ip: &str) {
        *self.answer.lock().unwrap() = Some(ip.to_string());
    }

    pub fn set_failing(&self) {
        *self.answer.lock().unwrap() = None;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn domains(&self) -> Vec<String> {
        self.domains.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostnameResolver for MockHostnameResolver {
    async fn resolve_hostname_ip(&self, domain: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.domains.lock().unwrap().push(domain.to_string());
        self.answer
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::resolution(format!("{}.duckdns.org: SERVFAIL", domain)))
    }
}

/// A recorded update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub domain: String,
    pub token: String,
    pub ip: String,
}

/// Update client returning a settable result
#[derive(Clone)]
pub struct MockUpdateClient {
    result: Arc<Mutex<UpdateResult>>,
    calls: Arc<Mutex<Vec<UpdateCall>>>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockUpdateClient {
    pub fn new(result: UpdateResult) -> Self {
        Self {
            result: Arc::new(Mutex::new(result)),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every call take `delay` (simulates a slow provider)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_result(&self, result: UpdateResult) {
        *self.result.lock().unwrap() = result;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<UpdateCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of overlapping calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UpdateClient for MockUpdateClient {
    async fn update(&self, domain: &str, token: &str, ip: &str) -> UpdateResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.calls.lock().unwrap().push(UpdateCall {
            domain: domain.to_string(),
            token: token.to_string(),
            ip: ip.to_string(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        *self.result.lock().unwrap()
    }
}

/// Notifier that records everything it is given
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str, severity: Severity) {
        self.seen.lock().unwrap().push(Notification {
            title: title.to_string(),
            body: body.to_string(),
            severity,
        });
    }
}

/// Status sink that records every text it is given
#[derive(Clone, Default)]
pub struct RecordingStatusSink {
    texts: Arc<Mutex<Vec<String>>>,
}

impl RecordingStatusSink {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

impl StatusSink for RecordingStatusSink {
    fn set_status_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }
}

/// All doubles for one engine, with shared counters
#[derive(Clone)]
pub struct Harness {
    pub ip: MockIpResolver,
    pub hostname: MockHostnameResolver,
    pub client: MockUpdateClient,
    pub notifier: RecordingNotifier,
    pub status: RecordingStatusSink,
}

impl Harness {
    pub fn new(current_ip: &str, recorded_ip: &str, result: UpdateResult) -> Self {
        Self {
            ip: MockIpResolver::new(current_ip),
            hostname: MockHostnameResolver::new(recorded_ip),
            client: MockUpdateClient::new(result),
            notifier: RecordingNotifier::default(),
            status: RecordingStatusSink::default(),
        }
    }

    pub fn engine(&self) -> ReconciliationEngine {
        ReconciliationEngine::new(
            Box::new(self.ip.clone()),
            Box::new(self.hostname.clone()),
            Box::new(self.client.clone()),
        )
    }

    pub fn scheduler(&self, settings: impl SettingsSource + 'static) -> Scheduler {
        Scheduler::new(
            self.engine(),
            Box::new(settings),
            Box::new(self.notifier.clone()),
            Box::new(self.status.clone()),
        )
    }

    /// Number of outbound calls of any kind
    pub fn network_calls(&self) -> usize {
        self.ip.call_count() + self.hostname.call_count() + self.client.call_count()
    }
}
