//! HTTP transport abstraction for catalog requests.

use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use super::error::TransportError;
use super::proxy::ProxyEndpoint;

/// Trait for executing a single catalog GET.
///
/// Lets the resolver be exercised without a network by injecting a fake
/// transport in tests.
pub trait CatalogTransport: Send + Sync {
    /// Fetch `url` through `proxy`, returning the response body.
    ///
    /// Implementations must not follow redirects and must give up after
    /// `timeout`. The body is returned whatever the status; deciding whether
    /// it is usable is left to the caller.
    fn fetch(&self, url: &Url, proxy: &ProxyEndpoint, timeout: Duration)
        -> Result<Vec<u8>, TransportError>;
}

/// Real transport using a blocking reqwest client.
///
/// A fresh client is built per request since the proxy differs between
/// attempts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestCatalogTransport;

impl ReqwestCatalogTransport {
    pub fn new() -> Self {
        Self
    }

    fn client(
        proxy: &ProxyEndpoint,
        timeout: Duration,
    ) -> Result<reqwest::blocking::Client, TransportError> {
        let builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none());

        let builder = match proxy {
            ProxyEndpoint::Direct => builder.no_proxy(),
            ProxyEndpoint::Http(server) => {
                let proxy = reqwest::Proxy::all(server.as_str()).map_err(|e| {
                    TransportError::Setup(format!("invalid proxy {}: {}", server, e))
                })?;
                builder.proxy(proxy)
            }
        };

        builder
            .build()
            .map_err(|e| TransportError::Setup(format!("failed to create HTTP client: {}", e)))
    }
}

impl CatalogTransport for ReqwestCatalogTransport {
    fn fetch(
        &self,
        url: &Url,
        proxy: &ProxyEndpoint,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let client = Self::client(proxy, timeout)?;

        let response = client
            .get(url.clone())
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| TransportError::Request(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            debug!(
                status = status.as_u16(),
                proxy = %proxy,
                bytes = body.len(),
                "catalog answered with non-success status"
            );
        }
        Ok(body.to_vec())
    }
}
