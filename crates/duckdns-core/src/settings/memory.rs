// # Memory Settings
//
// In-memory implementation of SettingsSource.
//
// ## Purpose
//
// Lets an embedding application (tray UI, settings dialog, tests) own the
// configuration and swap it at any time. The scheduler sees the change on
// its next tick.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::Configuration;
use crate::traits::SettingsSource;

/// Shared in-memory settings
///
/// Clones share the same underlying configuration, so one clone can be
/// handed to the scheduler while another stays with the UI.
///
/// # Example
///
/// ```rust,no_run
/// use duckdns_core::config::Configuration;
/// use duckdns_core::settings::MemorySettings;
///
/// #[tokio::main]
/// async fn main() {
///     let settings = MemorySettings::default();
///     let for_scheduler = settings.clone();
///
///     settings.replace(Configuration::new("alice", "tok123")).await;
///     assert_eq!(for_scheduler.current().await.domain, "alice");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    inner: Arc<RwLock<Configuration>>,
}

impl MemorySettings {
    /// Create settings holding `config`
    pub fn new(config: Configuration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config.normalized())),
        }
    }

    /// Replace the configuration
    pub async fn replace(&self, config: Configuration) {
        *self.inner.write().await = config.normalized();
    }

    /// Copy of the current configuration
    pub async fn current(&self) -> Configuration {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl SettingsSource for MemorySettings {
    async fn load(&self) -> Result<Configuration, Error> {
        Ok(self.current().await)
    }
}
