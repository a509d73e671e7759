//! Application error types.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigFileError;
use crate::geometry::GeometryError;
use crate::mirror::MirrorError;
use crate::query::ValidationError;
use crate::store::StoreError;

/// Result type for session operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors that can occur while running a mirror session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Region or grid could not be used.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Search parameters were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Catalog search or tile matching failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Reconciling the local mirror failed.
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    /// The object store client could not be created.
    #[error("object store unavailable: {0}")]
    Store(#[from] StoreError),

    /// The configuration file could not be used.
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    /// A setting required for this operation is missing.
    #[error("Configuration error: {0}")]
    Config(String),
}
