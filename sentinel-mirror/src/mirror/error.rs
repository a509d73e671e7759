//! Error types for mirror reconciliation.

use std::io;
use std::path::PathBuf;

use crate::store::StoreError;

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors that abort reconciliation of a product, and with it the batch.
#[derive(Debug)]
pub enum MirrorError {
    /// The remote listing for a matched product was empty.
    ProductNotFound { key: String },

    /// A path that must be a directory exists as something else.
    NotADirectory { path: PathBuf },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to inspect local state.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a stale artifact.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// An object key would resolve outside the mirror root.
    UnsafeKey { key: String },

    /// Listing the product's objects failed.
    Listing { key: String, source: StoreError },

    /// Transferring one of the product's objects failed.
    Transfer {
        product: String,
        key: String,
        source: StoreError,
    },
}

impl std::fmt::Display for MirrorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProductNotFound { key } => {
                write!(f, "product not found in object store: {}", key)
            }
            Self::NotADirectory { path } => {
                write!(f, "expected a directory at {}", path.display())
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            Self::UnsafeKey { key } => {
                write!(f, "refusing object key outside the mirror: {}", key)
            }
            Self::Listing { key, source } => {
                write!(f, "failed to list product {}: {}", key, source)
            }
            Self::Transfer {
                product,
                key,
                source,
            } => {
                write!(
                    f,
                    "failed to transfer {} (product {}): {}",
                    key, product, source
                )
            }
        }
    }
}

impl std::error::Error for MirrorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::ReadFailed { source, .. } => Some(source),
            Self::RemoveFailed { source, .. } => Some(source),
            Self::Listing { source, .. } => Some(source),
            Self::Transfer { source, .. } => Some(source),
            _ => None,
        }
    }
}
