// # duckdns-core
//
// Core library for the DuckDNS updater.
//
// ## Architecture Overview
//
// This library keeps a DuckDNS hostname pointed at the machine's public IP:
// - **IpResolver**: Trait for learning the current public IP
// - **HostnameResolver**: Trait for learning what the hostname resolves to
// - **UpdateClient**: Trait for pushing a new IP to the provider
// - **ReconciliationEngine**: Compares the two and updates only on mismatch
// - **Scheduler**: Ticks once a second and runs the engine on schedule
// - **SettingsSource / Notifier / StatusSink**: Seams to the surrounding UI
//
// ## Design Principles
//
// 1. **Single writer**: One scheduler task owns the engine and its state
// 2. **No retries**: The next scheduled tick is the retry
// 3. **Nothing fatal**: Every failure becomes state, status text or a notification
// 4. **Library-First**: The daemon is a thin shell around this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod settings;
pub mod status;
pub mod traits;

// Re-export core types for convenience
pub use config::{Configuration, RefreshInterval};
pub use engine::{AttemptOutcome, AttemptReport, ReconciliationEngine, ReconciliationState, StateSnapshot};
pub use error::{Error, Result};
pub use scheduler::{ForceHandle, Scheduler};
pub use settings::{FileSettings, MemorySettings};
pub use traits::{
    HostnameResolver, IpResolver, Notification, Notifier, SettingsSource, Severity, StatusSink,
    UpdateClient, UpdateResult,
};
