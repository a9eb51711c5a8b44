// # HTTP IP Resolver
//
// This crate provides an HTTP-based IpResolver for the DuckDNS updater.
//
// ## Architecture
//
// Issues a single GET to a public "echo my IP" service (by default
// checkip.amazonaws.com) and returns the trimmed plain-text body.
//
// ## Failure Policy
//
// Nothing here is an error. A timeout, a connection failure, a non-2xx
// status or an implausibly short body all yield an empty string, which tells
// DuckDNS to infer the address from the update request itself.

use duckdns_core::config::{DEFAULT_IP_LOOKUP_URL, NETWORK_TIMEOUT};
use duckdns_core::traits::IpResolver;
use duckdns_core::traits::ip_resolver::plausible_ip;
use duckdns_core::{Error, Result};

/// HTTP-based public IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against the default echo service
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_IP_LOOKUP_URL)
    }

    /// Create a resolver against a custom echo service
    ///
    /// # Parameters
    ///
    /// - `url`: URL returning the caller's IP as plain text
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(NETWORK_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// URL this resolver queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw body from the echo service
    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| Error::network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!("HTTP error: {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve_current_ip(&self) -> String {
        match self.fetch_body().await {
            Ok(body) => {
                let ip = plausible_ip(&body);
                if ip.is_empty() {
                    tracing::warn!(
                        "Implausible IP from {} ({:?}), letting DuckDNS infer it",
                        self.url,
                        body.trim()
                    );
                } else {
                    tracing::debug!("Public IP from {}: {}", self.url, ip);
                }
                ip
            }
            Err(e) => {
                tracing::warn!("Public IP lookup via {} failed: {}", self.url, e);
                String::new()
            }
        }
    }
}
