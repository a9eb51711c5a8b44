// # Hostname Resolver Trait
//
// Defines the interface for resolving the managed hostname to the address
// it currently answers with.
//
// ## Implementations
//
// - System DNS configuration: `duckdns-dns` crate

use async_trait::async_trait;

/// Trait for hostname resolution implementations
///
/// Two failure shapes must stay distinct:
///
/// - `Ok(String::new())`: the name exists in no record yet. This is a
///   legitimate first-run state and must not block reconciliation.
/// - `Err(_)`: the lookup itself failed (timeout, SERVFAIL, no network).
///   The engine skips the attempt and tries again next interval.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    /// Resolve `{domain}.{suffix}` to its current address
    ///
    /// # Parameters
    ///
    /// - `domain`: DNS label without the provider suffix
    async fn resolve_hostname_ip(&self, domain: &str) -> Result<String, crate::Error>;
}

/// Build the fully-qualified hostname for a domain label
pub fn qualified_hostname(domain: &str, suffix: &str) -> String {
    let suffix = suffix.trim_matches('.');
    if suffix.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", domain, suffix)
    }
}
