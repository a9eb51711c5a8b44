//! Engine-owned reconciliation state and its read-only snapshot

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Outcome of the most recent attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttemptOutcome {
    /// No attempt has run, or settings are incomplete
    #[default]
    NotYetRun,
    /// Public IP already matched the hostname's record
    Unchanged,
    /// The provider accepted a new address
    Updated,
    /// The provider rejected the domain/token
    RemoteRejected,
    /// The provider could not be reached or answered nonsense
    RemoteUnreachable,
    /// Hostname resolution failed; attempt skipped
    LookupFailed,
}

/// State owned by the reconciliation engine
///
/// Only the scheduler task mutates this. Everyone else sees clones through a
/// [`StateSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationState {
    /// Ticks counted since the last completed attempt
    pub elapsed_seconds: u64,
    /// Address last accepted by the provider; empty means unknown
    pub last_known_ip: String,
    /// Short human-readable summary of the last attempt
    pub last_status_message: String,
    pub last_attempt_outcome: AttemptOutcome,
    pub last_attempt_at: Option<DateTime<Local>>,
}

/// Read-only view of [`ReconciliationState`]
///
/// Values may be up to one tick stale.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    rx: watch::Receiver<ReconciliationState>,
}

impl StateSnapshot {
    pub(crate) fn new(rx: watch::Receiver<ReconciliationState>) -> Self {
        Self { rx }
    }

    /// Copy of the latest published state
    pub fn current(&self) -> ReconciliationState {
        self.rx.borrow().clone()
    }

    /// Wait until the engine publishes a new state
    ///
    /// Returns `false` once the engine has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Stream of published states, starting with the current one
    pub fn changes(&self) -> WatchStream<ReconciliationState> {
        WatchStream::new(self.rx.clone())
    }
}
