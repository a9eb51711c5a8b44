// # File Settings
//
// JSON file implementation of SettingsSource.
//
// ## Purpose
//
// Lets an operator (or an external settings editor) change the updater's
// settings by editing a file. The file is re-read on every load, so edits
// take effect on the next tick without a restart.
//
// ## File Format
//
// ```json
// {
//   "domain": "alice",
//   "token": "00000000-0000-0000-0000-000000000000",
//   "refresh_minutes": 5,
//   "notify_on_unchanged": true
// }
// ```
//
// A missing file means "not configured yet". A file that fails to parse is
// an error; the scheduler keeps its last good configuration.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::config::Configuration;
use crate::traits::SettingsSource;

/// File-backed settings
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    /// Create a settings source reading `path`
    ///
    /// The file does not need to exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `config` atomically (temp file, then rename)
    ///
    /// The core never calls this; it exists for settings editors.
    pub async fn save(&self, config: &Configuration) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(&config.clone().normalized())?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(json.as_bytes()).await?;
            file.flush().await?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::config(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

#[async_trait]
impl SettingsSource for FileSettings {
    async fn load(&self) -> Result<Configuration, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!("Settings file does not exist: {}", self.path.display());
                return Ok(Configuration::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Configuration = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(config.normalized())
    }
}
