//! Remote object store access.
//!
//! The mirror only needs two operations from the remote side: list every
//! object under a key prefix and stream one object to a local file.
//! [`ObjectStore`] captures exactly that, so the reconciler can run against
//! the S3 adapter in production and an in-memory fake in tests.

mod error;
mod s3;

pub use error::{StoreError, StoreResult};
pub use s3::{S3ObjectStore, S3StoreConfig, DEFAULT_STORAGE_ENDPOINT, DEFAULT_STORAGE_REGION};

use std::path::Path;

/// An object as reported by a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Full key inside the bucket.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
}

impl RemoteObject {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    /// Keys ending in `/` stand for directories and carry no content.
    pub fn is_directory_marker(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Blocking access to a bucket.
///
/// Implementations must be shareable across the transfer worker threads.
pub trait ObjectStore: Send + Sync {
    /// List every object whose key starts with `prefix`, across all pages.
    fn list(&self, prefix: &str) -> StoreResult<Vec<RemoteObject>>;

    /// Stream object `key` into `dest`, creating or truncating the file.
    ///
    /// `progress` is called with the size of every chunk written. Returns
    /// the number of bytes written. The parent directory must exist.
    fn download(&self, key: &str, dest: &Path, progress: &mut dyn FnMut(u64)) -> StoreResult<u64>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<S> {
    fn list(&self, prefix: &str) -> StoreResult<Vec<RemoteObject>> {
        (**self).list(prefix)
    }

    fn download(&self, key: &str, dest: &Path, progress: &mut dyn FnMut(u64)) -> StoreResult<u64> {
        (**self).download(key, dest, progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_marker() {
        assert!(RemoteObject::new("A/B.SAFE/GRANULE/", 0).is_directory_marker());
        assert!(!RemoteObject::new("A/B.SAFE/manifest.safe", 10).is_directory_marker());
    }
}
