//! Error types for object store access.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for object store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from an [`ObjectStore`](super::ObjectStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client or its runtime could not be set up.
    #[error("object store client setup failed: {0}")]
    Setup(String),

    /// A listing request failed.
    #[error("failed to list objects under '{prefix}': {reason}")]
    List { prefix: String, reason: String },

    /// Fetching or streaming an object failed.
    #[error("failed to fetch object '{key}': {reason}")]
    Fetch { key: String, reason: String },

    /// Writing the local copy failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
