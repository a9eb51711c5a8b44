//! Fixed-period scheduler
//!
//! Drives the [`ReconciliationEngine`] from a single task at 1-second
//! resolution. Each tick:
//!
//! 1. Re-reads settings (falling back to the last good copy on error)
//! 2. Consumes a pending force signal, priming the counter
//! 3. Advances the counter
//! 4. Runs an attempt once the counter exceeds the refresh interval
//!
//! Attempts are awaited inside the tick handler, so a slow attempt simply
//! delays the next tick. There is no way to start a second attempt while
//! one is in flight.

use crate::config::Configuration;
use crate::engine::{AttemptReport, ReconciliationEngine, StateSnapshot};
use crate::traits::{Notification, Notifier, Severity, SettingsSource, StatusSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Thread-safe "update now" signal
///
/// Any task or thread may call [`ForceHandle::force`]. The scheduler picks the
/// signal up on its own task at the next tick; the engine is never called
/// from the forcing thread.
#[derive(Debug, Clone, Default)]
pub struct ForceHandle {
    pending: Arc<AtomicBool>,
}

impl ForceHandle {
    /// Request an attempt on the next tick
    pub fn force(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Whether a request is waiting to be consumed
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

/// Tick source and owner of the engine
pub struct Scheduler {
    engine: ReconciliationEngine,
    settings: Box<dyn SettingsSource>,
    notifier: Box<dyn Notifier>,
    status_sink: Box<dyn StatusSink>,
    force: ForceHandle,
    tick_period: Duration,

    /// Last successfully loaded settings
    config: Configuration,
}

impl Scheduler {
    /// Create a scheduler around `engine`
    pub fn new(
        engine: ReconciliationEngine,
        settings: Box<dyn SettingsSource>,
        notifier: Box<dyn Notifier>,
        status_sink: Box<dyn StatusSink>,
    ) -> Self {
        Self {
            engine,
            settings,
            notifier,
            status_sink,
            force: ForceHandle::default(),
            tick_period: TICK_PERIOD,
            config: Configuration::default(),
        }
    }

    /// Override the tick period (tests, embedding)
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Handle for requesting an immediate attempt
    pub fn force_handle(&self) -> ForceHandle {
        self.force.clone()
    }

    /// Read-only view of the engine state
    pub fn snapshot(&self) -> StateSnapshot {
        self.engine.subscribe()
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    /// Configuration seen on the last tick
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Prepare for the first tick
    ///
    /// Loads settings, shows the one-time "please configure" notice when
    /// domain or token is missing, and primes the counter so the first tick
    /// runs an attempt.
    pub async fn start(&mut self) {
        self.reload_settings().await;

        if !self.config.is_configured() {
            Notification::new(
                "Please configure your DuckDNS domain and token!",
                Severity::Info,
            )
            .deliver(self.notifier.as_ref());
        }

        self.engine.prime(self.config.refresh_secs());
        self.status_sink
            .set_status_text(&self.engine.status_text(&self.config));
    }

    /// Handle one tick
    ///
    /// Returns the attempt report when this tick ran an attempt.
    pub async fn tick(&mut self) -> Option<AttemptReport> {
        let previous = self.config.clone();
        self.reload_settings().await;

        if self.config.is_configured() && self.config.credentials_differ(&previous) {
            info!("Settings changed for {}, updating now", self.config.domain);
            self.force.force();
        }

        let interval = self.config.refresh_secs();

        if self.force.take() {
            debug!("Force update requested");
            self.engine.prime(interval);
            self.status_sink
                .set_status_text(&self.engine.status_text(&self.config));
        }

        if self.engine.advance() <= interval {
            return None;
        }

        let report = self.engine.run_attempt(&self.config).await;

        if let Some(notification) = &report.notification {
            notification.deliver(self.notifier.as_ref());
        }
        self.status_sink.set_status_text(&report.status_text);

        Some(report)
    }

    /// Run until Ctrl-C
    pub async fn run(self) {
        self.run_with_shutdown(None).await
    }

    /// Run until `shutdown_rx` fires (or Ctrl-C when `None`)
    ///
    /// An attempt in progress is never interrupted; shutdown is observed
    /// between ticks.
    pub async fn run_with_shutdown(mut self, shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>) {
        self.start().await;

        let mut ticker = tokio::time::interval(self.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
        };
        tokio::pin!(shutdown);

        info!("Scheduler started (tick period {:?})", self.tick_period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received, scheduler stopped");
                    break;
                }
            }
        }
    }

    async fn reload_settings(&mut self) {
        match self.settings.load().await {
            Ok(config) => self.config = config,
            Err(e) => warn!("Failed to load settings, keeping previous: {}", e),
        }
    }
}
