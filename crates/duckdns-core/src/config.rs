//! Configuration types for the DuckDNS updater
//!
//! The core only ever reads a [`Configuration`]; storing and editing it is the
//! job of a [`SettingsSource`](crate::traits::SettingsSource).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// DNS zone the managed hostname lives under
pub const DEFAULT_HOSTNAME_SUFFIX: &str = "duckdns.org";

/// Provider update endpoint
pub const DEFAULT_UPDATE_URL: &str = "https://www.duckdns.org/update";

/// Public "echo my IP" service
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://checkip.amazonaws.com";

/// Upper bound on every outbound network call
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

/// User-facing settings for one managed hostname
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// DNS label without the provider suffix (e.g. "alice")
    #[serde(default)]
    pub domain: String,

    /// Opaque account token
    #[serde(default)]
    pub token: String,

    /// Time between reconciliation attempts
    #[serde(default, rename = "refresh_minutes")]
    pub refresh_interval: RefreshInterval,

    /// Whether to emit informational notifications
    #[serde(default = "default_notify")]
    pub notify_on_unchanged: bool,
}

impl Configuration {
    /// Create a configuration with the default interval and notifications on
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: normalize_domain(&domain.into()),
            token: token.into().trim().to_string(),
            refresh_interval: RefreshInterval::default(),
            notify_on_unchanged: true,
        }
    }

    /// Set the refresh interval
    pub fn with_refresh_interval(mut self, interval: RefreshInterval) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Enable or disable informational notifications
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notify_on_unchanged = enabled;
        self
    }

    /// Re-apply domain and token clean-up after deserialization
    pub fn normalized(mut self) -> Self {
        self.domain = normalize_domain(&self.domain);
        self.token = self.token.trim().to_string();
        self
    }

    /// True when both domain and token are present
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty() && !self.token.is_empty()
    }

    /// Refresh interval in seconds
    pub fn refresh_secs(&self) -> u64 {
        self.refresh_interval.as_secs()
    }

    /// Whether `other` points the updater at a different account or hostname
    pub fn credentials_differ(&self, other: &Configuration) -> bool {
        self.domain != other.domain || self.token != other.token
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            domain: String::new(),
            token: String::new(),
            refresh_interval: RefreshInterval::default(),
            notify_on_unchanged: default_notify(),
        }
    }
}

// The token is a credential; keep it out of logs.
impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("domain", &self.domain)
            .field("token", &"<REDACTED>")
            .field("refresh_interval", &self.refresh_interval)
            .field("notify_on_unchanged", &self.notify_on_unchanged)
            .finish()
    }
}

fn default_notify() -> bool {
    true
}

/// Strip whitespace and a pasted `.duckdns.org` suffix from a domain
pub fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('.');
    let suffix = format!(".{}", DEFAULT_HOSTNAME_SUFFIX);
    domain
        .strip_suffix(suffix.as_str())
        .unwrap_or(domain)
        .to_string()
}

/// Supported refresh intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RefreshInterval {
    #[default]
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
}

impl RefreshInterval {
    /// All selectable intervals, shortest first
    pub const ALL: [RefreshInterval; 5] = [
        RefreshInterval::FiveMinutes,
        RefreshInterval::TenMinutes,
        RefreshInterval::FifteenMinutes,
        RefreshInterval::ThirtyMinutes,
        RefreshInterval::SixtyMinutes,
    ];

    /// Interval length in minutes
    pub fn as_minutes(self) -> u32 {
        match self {
            RefreshInterval::FiveMinutes => 5,
            RefreshInterval::TenMinutes => 10,
            RefreshInterval::FifteenMinutes => 15,
            RefreshInterval::ThirtyMinutes => 30,
            RefreshInterval::SixtyMinutes => 60,
        }
    }

    /// Interval length in seconds
    pub fn as_secs(self) -> u64 {
        u64::from(self.as_minutes()) * 60
    }

    /// Look up an interval by its minute count
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_minutes() == minutes)
    }
}

impl TryFrom<u32> for RefreshInterval {
    type Error = crate::Error;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes).ok_or_else(|| {
            crate::Error::config(format!(
                "Refresh interval must be one of 5, 10, 15, 30 or 60 minutes. Got: {}",
                minutes
            ))
        })
    }
}

impl From<RefreshInterval> for u32 {
    fn from(interval: RefreshInterval) -> Self {
        interval.as_minutes()
    }
}
