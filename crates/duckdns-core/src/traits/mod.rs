//! Core traits for the DuckDNS updater
//!
//! This module defines the seams between the reconciliation engine and the
//! outside world.
//!
//! - [`IpResolver`]: Learn the machine's current public IP
//! - [`HostnameResolver`]: Learn what the managed hostname resolves to
//! - [`UpdateClient`]: Push a new IP to the provider
//! - [`Notifier`] / [`StatusSink`]: Report attempt outcomes to a UI
//! - [`SettingsSource`]: Supply the configuration, fresh every tick

pub mod hostname_resolver;
pub mod ip_resolver;
pub mod notifier;
pub mod settings_source;
pub mod update_client;

pub use hostname_resolver::HostnameResolver;
pub use ip_resolver::IpResolver;
pub use notifier::{Notification, Notifier, Severity, StatusSink};
pub use settings_source::SettingsSource;
pub use update_client::{UpdateClient, UpdateResult};
