// # Settings Source Trait
//
// Defines where the scheduler gets its configuration from. Settings are
// re-read on every tick so that edits take effect without a restart.
//
// ## Implementations
//
// - In-memory: `MemorySettings` (embedding UIs)
// - JSON file: `FileSettings`
// - Environment: `duckdnsd`

use async_trait::async_trait;

use crate::config::Configuration;

/// Trait for configuration providers
///
/// The core never writes through this trait. Implementations should be
/// cheap: `load()` runs once per second.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Load the current configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Configuration)`: The settings as they are right now
    /// - `Err(Error)`: If the settings could not be read; the scheduler keeps
    ///   using the last good configuration
    async fn load(&self) -> Result<Configuration, crate::Error>;
}
