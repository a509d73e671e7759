//! Catalog resolver: runs the filter against the remote catalog and maps the
//! returned products back to the selected tiles.
//!
//! ```text
//! SearchQuery ──► query::build ──► FilterExpression ──► URL
//!                                                        │
//!                  ProxySource::candidates ──► first_success over
//!                                              CatalogTransport::fetch
//!                                                        │
//!                          CatalogResponse ──► match_products ──► Vec<ProductPath>
//! ```
//!
//! Proxies are assumed unreliable. Each one gets a single attempt and
//! failures are only logged; the caller sees either a result or
//! [`CatalogError::NetworkExhausted`].

mod error;
mod failover;
mod product;
mod proxy;
mod resolver;
mod transport;

pub use error::{CatalogError, CatalogResult, TransportError};
pub use failover::{first_success, Failover};
pub use product::{
    code_matches, tile_code, CatalogProduct, CatalogResponse, ProductPath, TILE_CODE_LEN,
    TILE_CODE_OFFSET,
};
pub use proxy::{ProxyEndpoint, ProxySource, StaticProxySource};
pub use resolver::{
    match_products, CatalogResolver, ResolverConfig, DEFAULT_BUCKET, DEFAULT_CATALOG_ENDPOINT,
    DEFAULT_CATALOG_TIMEOUT,
};
pub use transport::{CatalogTransport, ReqwestCatalogTransport};
