// # DNS Hostname Resolver
//
// This crate provides the HostnameResolver implementation for the DuckDNS
// updater, backed by hickory-resolver and the system DNS configuration.
//
// ## Behavior
//
// - Resolves `{domain}.{suffix}` (suffix defaults to `duckdns.org`)
// - Prefers an IPv4 answer, falls back to the first address of any family
// - NOERROR without addresses → `Ok("")`
// - NXDOMAIN, timeout or server failure → `Err(Resolution)`
// - Whole lookup bounded at 10 seconds

use async_trait::async_trait;
use duckdns_core::config::{DEFAULT_HOSTNAME_SUFFIX, NETWORK_TIMEOUT};
use duckdns_core::traits::HostnameResolver;
use duckdns_core::traits::hostname_resolver::qualified_hostname;
use duckdns_core::{Error, Result};
use hickory_resolver::lookup_ip::LookupIp;
use hickory_resolver::{ResolveError, TokioResolver};
use std::net::IpAddr;
use std::time::Duration;

/// Hostname resolver using the system's DNS servers
pub struct DnsHostnameResolver {
    resolver: TokioResolver,

    /// Zone appended to the domain label
    suffix: String,

    /// Upper bound on one lookup (hickory may try several servers)
    timeout: Duration,
}

impl DnsHostnameResolver {
    /// Create a resolver for `*.duckdns.org`
    pub fn new() -> Result<Self> {
        Self::with_suffix(DEFAULT_HOSTNAME_SUFFIX)
    }

    /// Create a resolver for a custom zone
    ///
    /// # Errors
    ///
    /// Returns `Error::Resolution` if the system resolver configuration
    /// cannot be read.
    pub fn with_suffix(suffix: impl Into<String>) -> Result<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| Error::resolution(format!("failed to create resolver: {e}")))?
            .build();

        Ok(Self {
            resolver,
            suffix: suffix.into(),
            timeout: NETWORK_TIMEOUT,
        })
    }

    /// Zone appended to domain labels
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl std::fmt::Debug for DnsHostnameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsHostnameResolver")
            .field("suffix", &self.suffix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl HostnameResolver for DnsHostnameResolver {
    async fn resolve_hostname_ip(&self, domain: &str) -> Result<String> {
        let host = qualified_hostname(domain, &self.suffix);

        let lookup = tokio::time::timeout(self.timeout, self.resolver.lookup_ip(host.as_str()))
            .await
            .map_err(|_| Error::resolution(format!("{host}: timed out after {:?}", self.timeout)))?;

        let ip = classify(&host, lookup)?;
        tracing::debug!(name = %host, ip = %ip, "resolved hostname");
        Ok(ip)
    }
}

/// Map a lookup result onto the resolver contract
///
/// NXDOMAIN means the name does not exist and is an error. NOERROR with no
/// address records means the name exists without an address yet.
fn classify(host: &str, lookup: std::result::Result<LookupIp, ResolveError>) -> Result<String> {
    match lookup {
        Ok(answer) => Ok(preferred_address(answer.iter())
            .map(|ip| ip.to_string())
            .unwrap_or_default()),
        Err(e) if e.is_nx_domain() => Err(Error::resolution(format!("{host}: unknown host"))),
        Err(e) if e.is_no_records_found() => Ok(String::new()),
        Err(e) => Err(Error::resolution(format!("{host}: {e}"))),
    }
}

/// Pick the address to compare against: first IPv4, else first of any family
fn preferred_address(addresses: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut first = None;
    for ip in addresses {
        if ip.is_ipv4() {
            return Some(ip);
        }
        first.get_or_insert(ip);
    }
    first
}
