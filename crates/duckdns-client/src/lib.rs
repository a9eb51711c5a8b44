// # DuckDNS Update Client
//
// This crate provides the UpdateClient implementation for the DuckDNS
// HTTP API.
//
// ## Behavior
//
// - One GET per call: `/update?domains=<domain>&token=<token>&ip=<ip>`
// - 10 second timeout, fixed identifying user agent
// - Body `OK` → Accepted, `KO` → Rejected, anything else → Unreachable
// - ❌ NO retry logic (the next scheduled tick is the retry)
//
// ## Security Requirements
//
// - The token NEVER appears in logs. reqwest errors carry the request URL
//   (which contains the token), so URLs are stripped before logging.

use async_trait::async_trait;
use duckdns_core::config::{DEFAULT_UPDATE_URL, NETWORK_TIMEOUT};
use duckdns_core::traits::{UpdateClient, UpdateResult};
use duckdns_core::{Error, Result};
use std::time::Duration;

/// User agent sent with every update
pub const USER_AGENT: &str = concat!("duckdns-updater/", env!("CARGO_PKG_VERSION"));

/// DuckDNS update client
#[derive(Debug, Clone)]
pub struct DuckDnsClient {
    /// Update endpoint
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl DuckDnsClient {
    /// Create a client against the public DuckDNS endpoint
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_UPDATE_URL)
    }

    /// Create a client against a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, NETWORK_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue the update request and return the raw body
    async fn send_update(&self, domain: &str, token: &str, ip: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("domains", domain), ("token", token), ("ip", ip)])
            .send()
            .await
            .map_err(|e| Error::network(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            tracing::debug!("DuckDNS answered HTTP {}", status);
        }

        Ok(body)
    }
}

#[async_trait]
impl UpdateClient for DuckDnsClient {
    async fn update(&self, domain: &str, token: &str, ip: &str) -> UpdateResult {
        tracing::debug!(
            "Updating {} -> {}",
            domain,
            if ip.is_empty() { "(inferred)" } else { ip }
        );

        match self.send_update(domain, token, ip).await {
            Ok(body) => {
                let result = UpdateResult::from_body(&body);
                if result == UpdateResult::Unreachable {
                    let err = Error::malformed(body.trim().chars().take(64).collect::<String>());
                    tracing::warn!("Unexpected DuckDNS response: {}", err);
                }
                result
            }
            Err(e) => {
                tracing::warn!("DuckDNS update for {} failed: {}", domain, e);
                UpdateResult::Unreachable
            }
        }
    }
}
