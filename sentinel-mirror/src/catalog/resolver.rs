//! Catalog resolution with proxy failover.

use std::time::Duration;

use tracing::{debug, info};

use super::error::{CatalogError, CatalogResult};
use super::failover::{first_success, Failover};
use super::product::{code_matches, CatalogProduct, CatalogResponse, ProductPath};
use super::proxy::{ProxyEndpoint, ProxySource};
use super::transport::CatalogTransport;
use crate::coverage::TileSelection;
use crate::query::{self, SearchQuery};

/// Default OData products endpoint of the Copernicus Data Space catalog.
pub const DEFAULT_CATALOG_ENDPOINT: &str =
    "https://catalogue.dataspace.copernicus.eu/odata/v1/Products";

/// Default per-request timeout.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(60);

/// Default object store bucket the catalog paths point into.
pub const DEFAULT_BUCKET: &str = "eodata";

/// Configuration for [`CatalogResolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Catalog products endpoint, without query string.
    pub endpoint: String,

    /// Timeout applied to each proxy attempt.
    pub timeout: Duration,

    /// Bucket prefix stripped from catalog paths.
    pub bucket: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
            timeout: DEFAULT_CATALOG_TIMEOUT,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Set the catalog endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bucket name.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

/// Executes catalog searches and matches the results to selected tiles.
pub struct CatalogResolver<T, P> {
    transport: T,
    proxies: P,
    config: ResolverConfig,
}

impl<T: CatalogTransport, P: ProxySource> CatalogResolver<T, P> {
    pub fn new(transport: T, proxies: P, config: ResolverConfig) -> Self {
        Self {
            transport,
            proxies,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the search and return every product the catalog lists.
    ///
    /// Proxy candidates are tried in order, once each. The first candidate
    /// that yields a decodable response wins, even when that response is
    /// empty.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NetworkExhausted`] when no candidate answered
    /// - [`CatalogError::CatalogEmpty`] when the winning response lists nothing
    pub fn search(&self, query: &SearchQuery) -> CatalogResult<Vec<CatalogProduct>> {
        let filter = query::build(query);
        let url = filter.to_url(&self.config.endpoint)?;
        let candidates = self.proxies.candidates()?;

        info!(candidates = candidates.len(), "querying catalog");
        debug!(url = %url, "catalog request");

        let outcome = first_success(
            &candidates,
            |proxy: &ProxyEndpoint| -> Result<CatalogResponse, String> {
                let body = self
                    .transport
                    .fetch(&url, proxy, self.config.timeout)
                    .map_err(|e| e.to_string())?;
                serde_json::from_slice::<CatalogResponse>(&body)
                    .map_err(|e| format!("unparseable response: {}", e))
            },
            |proxy, reason| debug!(proxy = %proxy, reason = %reason, "catalog attempt failed"),
        );

        let response = match outcome {
            Failover::Success { value, attempts } => {
                info!(
                    attempts,
                    products = value.value.len(),
                    "catalog responded"
                );
                value
            }
            Failover::Exhausted { attempts } => {
                return Err(CatalogError::NetworkExhausted { attempts });
            }
        };

        if response.value.is_empty() {
            return Err(CatalogError::CatalogEmpty {
                filter: filter.into_string(),
            });
        }
        Ok(response.value)
    }

    /// Search the catalog and keep the products belonging to `selection`.
    ///
    /// # Errors
    ///
    /// Everything [`search`](Self::search) returns, plus
    /// [`CatalogError::NoMatchingTile`] when none of the products match.
    pub fn resolve(
        &self,
        query: &SearchQuery,
        selection: &TileSelection,
    ) -> CatalogResult<Vec<ProductPath>> {
        let products = self.search(query)?;
        let matched = match_products(&products, selection, &self.config.bucket);

        if matched.is_empty() {
            return Err(CatalogError::NoMatchingTile {
                returned: products.len(),
                tiles: selection.to_string(),
            });
        }

        info!(
            matched = matched.len(),
            returned = products.len(),
            "catalog products matched to tiles"
        );
        Ok(matched)
    }
}

/// Keep the products whose tile code is in `selection`, in catalog order.
///
/// Repeated products are kept as returned.
pub fn match_products(
    products: &[CatalogProduct],
    selection: &TileSelection,
    bucket: &str,
) -> Vec<ProductPath> {
    products
        .iter()
        .filter(|product| {
            product
                .tile_code()
                .is_some_and(|code| selection.iter().any(|tile| code_matches(code, tile)))
        })
        .map(|product| ProductPath::from_catalog(product.s3_path.as_str(), bucket))
        .collect()
}
