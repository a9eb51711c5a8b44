// # Update Client Trait
//
// Defines the interface for pushing a new address to the DNS provider.
//
// ## Implementations
//
// - DuckDNS HTTP API: `duckdns-client` crate
//
// ## Usage
//
// ```rust,ignore
// use duckdns_core::{UpdateClient, UpdateResult};
//
// let client = /* UpdateClient implementation */;
// match client.update("alice", "tok123", "5.6.7.8").await {
//     UpdateResult::Accepted => { /* record now points at 5.6.7.8 */ }
//     UpdateResult::Rejected => { /* domain or token is wrong */ }
//     UpdateResult::Unreachable => { /* try again next tick */ }
// }
// ```

use async_trait::async_trait;

/// Literal body the provider sends on success
pub const ACCEPTED_BODY: &str = "OK";

/// Literal body the provider sends for a bad domain/token pair
pub const REJECTED_BODY: &str = "KO";

/// Classified outcome of a single update call
///
/// Raw response text never leaves the client: the engine only ever sees
/// one of these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateResult {
    /// The provider answered `OK`
    Accepted,
    /// The provider answered `KO` (invalid domain or token)
    Rejected,
    /// No answer, a timeout, or any body other than `OK` / `KO`
    Unreachable,
}

impl UpdateResult {
    /// Classify a plain-text response body
    ///
    /// Only the exact literals count; surrounding whitespace is ignored
    /// because the provider terminates its body with a newline.
    pub fn from_body(body: &str) -> Self {
        match body.trim() {
            ACCEPTED_BODY => UpdateResult::Accepted,
            REJECTED_BODY => UpdateResult::Rejected,
            _ => UpdateResult::Unreachable,
        }
    }

    /// Map a failed outcome onto the error taxonomy (for logging)
    pub fn into_error(self, domain: &str) -> Option<crate::Error> {
        match self {
            UpdateResult::Accepted => None,
            UpdateResult::Rejected => Some(crate::Error::rejected(format!(
                "invalid domain or token for '{}'",
                domain
            ))),
            UpdateResult::Unreachable => Some(crate::Error::network(format!(
                "update service unreachable for '{}'",
                domain
            ))),
        }
    }
}

/// Trait for DNS provider update clients
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ One HTTP request per call, bounded by a timeout
/// - ✅ Classify the response body into [`UpdateResult`]
///
/// ## Forbidden Capabilities
/// - ❌ Retry logic or backoff (the next scheduled tick is the retry)
/// - ❌ Deciding whether an update is needed (owned by the engine)
/// - ❌ Logging the token
#[async_trait]
pub trait UpdateClient: Send + Sync {
    /// Point `domain` at `ip`
    ///
    /// # Parameters
    ///
    /// - `domain`: DNS label without the provider suffix
    /// - `token`: Opaque account token
    /// - `ip`: New address; empty lets the provider infer it from the request
    async fn update(&self, domain: &str, token: &str, ip: &str) -> UpdateResult;
}
