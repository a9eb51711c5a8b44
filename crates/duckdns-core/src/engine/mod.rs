//! Reconciliation engine
//!
//! The ReconciliationEngine is responsible for:
//! - Learning the current public IP via IpResolver
//! - Learning the hostname's recorded IP via HostnameResolver
//! - Calling the UpdateClient only when the two differ
//! - Turning the outcome into state, status text and a notification
//!
//! ## Architecture
//!
//! ```text
//!                        ┌────────────────────┐
//!   Scheduler ─ tick ──▶ │ ReconciliationEngine│ ──▶ AttemptReport
//!                        └────────────────────┘
//!                                  │
//!         ┌────────────────────────┼────────────────────────┐
//!         │                        │                        │
//!         ▼                        ▼                        ▼
//! ┌──────────────┐        ┌──────────────────┐      ┌──────────────┐
//! │  IpResolver  │        │ HostnameResolver │      │ UpdateClient │
//! │  (current)   │        │    (recorded)    │      │ (on mismatch)│
//! └──────────────┘        └──────────────────┘      └──────────────┘
//! ```
//!
//! ## Attempt Flow
//!
//! 1. Skip everything if domain or token is empty
//! 2. Resolve current IP (empty = let the provider infer it)
//! 3. Resolve recorded IP; a lookup error skips the attempt
//! 4. Equal and known: nothing to do. Otherwise: call the provider
//! 5. Reset the tick counter and refresh the status text
//!
//! The engine never retries. The next scheduled attempt is the retry.

mod state;

pub use state::{AttemptOutcome, ReconciliationState, StateSnapshot};

use crate::config::Configuration;
use crate::error::Error;
use crate::status::{self, display_ip};
use crate::traits::{HostnameResolver, IpResolver, Notification, Severity, UpdateClient, UpdateResult};
use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// What a single attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub outcome: AttemptOutcome,
    /// Notification to show, if any
    pub notification: Option<Notification>,
    /// Refreshed status text
    pub status_text: String,
}

/// Core reconciliation engine
///
/// ## Threading
///
/// The engine is owned by exactly one task (the scheduler). `run_attempt`
/// takes `&mut self`, so two attempts can never overlap. Other tasks observe
/// state through [`ReconciliationEngine::subscribe`].
pub struct ReconciliationEngine {
    ip_resolver: Box<dyn IpResolver>,
    hostname_resolver: Box<dyn HostnameResolver>,
    update_client: Box<dyn UpdateClient>,

    state: ReconciliationState,

    /// Publishes state snapshots to readers
    state_tx: watch::Sender<ReconciliationState>,
}

impl ReconciliationEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `ip_resolver`: Public IP lookup
    /// - `hostname_resolver`: DNS lookup for the managed hostname
    /// - `update_client`: Provider update call
    pub fn new(
        ip_resolver: Box<dyn IpResolver>,
        hostname_resolver: Box<dyn HostnameResolver>,
        update_client: Box<dyn UpdateClient>,
    ) -> Self {
        let state = ReconciliationState::default();
        let (state_tx, _) = watch::channel(state.clone());

        Self {
            ip_resolver,
            hostname_resolver,
            update_client,
            state,
            state_tx,
        }
    }

    /// Current state (owner view)
    pub fn state(&self) -> &ReconciliationState {
        &self.state
    }

    /// Read-only snapshot handle for other tasks
    pub fn subscribe(&self) -> StateSnapshot {
        StateSnapshot::new(self.state_tx.subscribe())
    }

    /// One-off public IP lookup ("what is my IP?")
    pub async fn public_ip(&self) -> String {
        self.ip_resolver.resolve_current_ip().await
    }

    /// Count one tick and return the new elapsed total
    pub fn advance(&mut self) -> u64 {
        self.state.elapsed_seconds += 1;
        self.publish();
        self.state.elapsed_seconds
    }

    /// Set the counter so the next tick exceeds `interval_secs`
    pub fn prime(&mut self, interval_secs: u64) {
        self.state.elapsed_seconds = interval_secs;
        self.publish();
    }

    /// Status text for the current state
    pub fn status_text(&self, config: &Configuration) -> String {
        status::render(&self.state, config, Local::now())
    }

    /// Run one reconciliation attempt
    ///
    /// Never fails: every outcome, including network trouble, is folded into
    /// the returned report and the engine's state.
    pub async fn run_attempt(&mut self, config: &Configuration) -> AttemptReport {
        if !config.is_configured() {
            debug!("Skipping attempt: {}", Error::ConfigurationMissing);
            return self.finish(
                config,
                AttemptOutcome::NotYetRun,
                "Not configured: set your DuckDNS domain and token".to_string(),
                None,
            );
        }

        let current_ip = self.ip_resolver.resolve_current_ip().await;
        if current_ip.is_empty() {
            info!("Public IP unknown, letting the provider infer it");
        }

        let recorded_ip = match self.hostname_resolver.resolve_hostname_ip(&config.domain).await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Skipping attempt for {}: {}", config.domain, e);
                return self.finish(
                    config,
                    AttemptOutcome::LookupFailed,
                    format!("Hostname lookup failed for {}", config.domain),
                    None,
                );
            }
        };

        debug!(
            "Current IP {} vs recorded IP {} for {}",
            display_ip(&current_ip),
            display_ip(&recorded_ip),
            config.domain
        );

        // An unknown public IP never matches: the provider infers it
        if !current_ip.is_empty() && current_ip == recorded_ip {
            let notification = config.notify_on_unchanged.then(|| {
                Notification::new(
                    format!(
                        "Update not necessary!\nOld IP Address: {}!\nNew IP Address: {}!",
                        display_ip(&recorded_ip),
                        display_ip(&current_ip)
                    ),
                    Severity::Info,
                )
            });
            return self.finish(
                config,
                AttemptOutcome::Unchanged,
                format!("IP unchanged: {}", display_ip(&recorded_ip)),
                notification,
            );
        }

        let result = self
            .update_client
            .update(&config.domain, &config.token, &current_ip)
            .await;

        match result.into_error(&config.domain) {
            Some(err) if err.is_transient() => warn!("Update failed: {}", err),
            Some(err) => error!("Update failed: {}", err),
            None => {}
        }

        match result {
            UpdateResult::Accepted => {
                info!(
                    "Updated {} -> {} (previous: {})",
                    config.domain,
                    display_ip(&current_ip),
                    display_ip(&recorded_ip)
                );
                let notification = config.notify_on_unchanged.then(|| {
                    Notification::new(
                        format!(
                            "DuckDNS successfully updated!\nOld IP Address: {}\nNew IP Address: {}",
                            display_ip(&recorded_ip),
                            display_ip(&current_ip)
                        ),
                        Severity::Info,
                    )
                });
                let message = format!(
                    "Old IP: {}\nNew IP: {}",
                    display_ip(&recorded_ip),
                    display_ip(&current_ip)
                );
                self.state.last_known_ip = current_ip;
                self.finish(config, AttemptOutcome::Updated, message, notification)
            }
            UpdateResult::Rejected => self.finish(
                config,
                AttemptOutcome::RemoteRejected,
                "Invalid domain or token".to_string(),
                Some(Notification::new(
                    "DuckDNS Error: Missing or invalid domain or token!\nPlease correct your settings!",
                    Severity::Error,
                )),
            ),
            UpdateResult::Unreachable => self.finish(
                config,
                AttemptOutcome::RemoteUnreachable,
                "Unable to reach DuckDNS.org".to_string(),
                Some(Notification::new("Unable to reach DuckDNS.org!", Severity::Warning)),
            ),
        }
    }

    /// Record the outcome, reset the counter and render the status text
    fn finish(
        &mut self,
        config: &Configuration,
        outcome: AttemptOutcome,
        message: String,
        notification: Option<Notification>,
    ) -> AttemptReport {
        let now = Local::now();

        self.state.elapsed_seconds = 0;
        self.state.last_attempt_outcome = outcome;
        self.state.last_status_message = message;
        self.state.last_attempt_at = Some(now);
        self.publish();

        AttemptReport {
            outcome,
            notification,
            status_text: status::render(&self.state, config, now),
        }
    }

    fn publish(&self) {
        // No receivers is fine: nobody is watching yet.
        self.state_tx.send_replace(self.state.clone());
    }
}
