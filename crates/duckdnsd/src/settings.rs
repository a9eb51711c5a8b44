//! Environment-backed settings
//!
//! Used when no settings file is configured. The process environment
//! cannot change from outside, so live edits need `DUCKDNS_SETTINGS_PATH`.
//!
//! - `DUCKDNS_DOMAIN`: Domain label (a pasted `.duckdns.org` suffix is stripped)
//! - `DUCKDNS_TOKEN`: Account token
//! - `DUCKDNS_REFRESH_MINUTES`: 5, 10, 15, 30 or 60 (default 5)
//! - `DUCKDNS_NOTIFY`: `yes`/`no` (default `yes`)

use async_trait::async_trait;
use duckdns_core::{Configuration, Error, RefreshInterval, Result, SettingsSource};
use std::env;

/// Settings read from `DUCKDNS_*` environment variables
#[derive(Debug, Default)]
pub struct EnvSettings;

impl EnvSettings {
    /// Parse settings from a variable lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Configuration> {
        let refresh_interval = match lookup("DUCKDNS_REFRESH_MINUTES") {
            Some(raw) => {
                let minutes: u32 = raw.trim().parse().map_err(|_| {
                    Error::config(format!("DUCKDNS_REFRESH_MINUTES is not a number: '{}'", raw))
                })?;
                RefreshInterval::try_from(minutes)?
            }
            None => RefreshInterval::default(),
        };

        let notify = match lookup("DUCKDNS_NOTIFY") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::config(format!("DUCKDNS_NOTIFY must be yes or no. Got: '{}'", raw))
            })?,
            None => true,
        };

        Ok(Configuration::new(
            lookup("DUCKDNS_DOMAIN").unwrap_or_default(),
            lookup("DUCKDNS_TOKEN").unwrap_or_default(),
        )
        .with_refresh_interval(refresh_interval)
        .with_notifications(notify))
    }
}

#[async_trait]
impl SettingsSource for EnvSettings {
    async fn load(&self) -> Result<Configuration> {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Some(true),
        "no" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}
