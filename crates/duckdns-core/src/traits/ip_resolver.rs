// # IP Resolver Trait
//
// Defines the interface for learning the machine's current public IPv4
// address from an external "echo my IP" service.
//
// ## Implementations
//
// - HTTP-based: `duckdns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use duckdns_core::IpResolver;
//
// let resolver = /* IpResolver implementation */;
// let ip = resolver.resolve_current_ip().await;
// if ip.is_empty() {
//     // let the provider infer the address from the request
// }
// ```

use async_trait::async_trait;

/// Shortest plausible dotted-quad ("1.1.1.1")
pub const MIN_PLAUSIBLE_IP_LEN: usize = 7;

/// Trait for public IP lookup implementations
///
/// An empty string is a valid answer: it means "unknown" and tells the
/// provider to infer the address from the update request itself. Lookup
/// failures are logged by the implementation and reported as empty, never
/// as errors.
///
/// # Forbidden Capabilities
/// - ❌ Retry or back off (the next scheduled tick is the retry)
/// - ❌ Cache answers between attempts
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IP, or an empty string if unknown
    async fn resolve_current_ip(&self) -> String;
}

/// Turn a raw echo-service body into an IP string
///
/// The body is trimmed; anything shorter than [`MIN_PLAUSIBLE_IP_LEN`] is
/// treated as unknown.
pub fn plausible_ip(body: &str) -> String {
    let ip = body.trim();
    if ip.len() < MIN_PLAUSIBLE_IP_LEN {
        String::new()
    } else {
        ip.to_string()
    }
}
