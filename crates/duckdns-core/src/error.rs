//! Error types for the DuckDNS updater
//!
//! Nothing in the reconciliation core is fatal: every variant here is
//! recoverable, either on the next scheduled tick or once the user fixes
//! their settings.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DuckDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Domain or token is empty
    #[error("DuckDNS domain and token are not configured")]
    ConfigurationMissing,

    /// Resolver or client timeout / IO failure
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The remote service reported an invalid domain/token combination
    #[error("Remote rejected update: {0}")]
    RemoteRejected(String),

    /// The remote service answered with neither `OK` nor `KO`
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Hostname resolution failed (distinct from "no record yet")
    #[error("Hostname resolution failed: {0}")]
    Resolution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkUnavailable(msg.into())
    }

    /// Create a remote rejection error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::RemoteRejected(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a hostname resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether the next scheduled tick may succeed without user action
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnavailable(_) | Self::MalformedResponse(_) | Self::Resolution(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
