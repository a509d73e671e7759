//! Error types for catalog resolution.

use thiserror::Error;

use crate::query::ValidationError;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by [`CatalogResolver`](super::CatalogResolver).
///
/// Individual proxy failures never show up here; only the aggregate outcome
/// of a resolution does.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No proxy candidate produced a parseable response.
    #[error("catalog unreachable: no usable response after {attempts} attempt(s)")]
    NetworkExhausted { attempts: usize },

    /// The catalog answered but listed no products.
    #[error("catalog returned no products for filter: {filter}")]
    CatalogEmpty { filter: String },

    /// Products were returned but none belongs to a selected tile.
    #[error("none of the {returned} returned product(s) match tiles [{tiles}]")]
    NoMatchingTile { returned: usize, tiles: String },

    /// The proxy source could not provide candidates.
    #[error("failed to obtain proxy candidates: {reason}")]
    ProxySource { reason: String },

    /// The configured catalog endpoint is not a valid URL.
    #[error("invalid catalog endpoint: {0}")]
    InvalidEndpoint(#[from] ValidationError),
}

/// Failure of a single catalog request.
///
/// Only logged by the resolver before moving on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The client could not be built for this proxy.
    #[error("client setup failed: {0}")]
    Setup(String),

    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Request(String),
}
