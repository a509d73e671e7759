//! Local mirror inspection and maintenance.
//!
//! The mirrored tree is its own manifest: nothing besides the files
//! themselves records what has been downloaded. All state is recomputed
//! from disk on every run.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use super::error::{MirrorError, MirrorResult};
use crate::catalog::ProductPath;

/// What the local mirror holds for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMirrorState {
    /// Object key of the product.
    pub key: String,
    /// `<root>/<key>`.
    pub product_dir: PathBuf,
    /// Whether an entry named after the product exists in its parent dir.
    pub marker_present: bool,
    /// Regular files under the product dir.
    pub file_count: usize,
    /// Sum of their sizes in bytes.
    pub total_bytes: u64,
}

impl LocalMirrorState {
    /// Inspect the mirror under `root` for `product`.
    ///
    /// A missing product directory is not an error; it reads as empty.
    pub fn inspect(root: &Path, product: &ProductPath) -> MirrorResult<Self> {
        let product_dir = object_destination(root, product.key())?;
        let parent = object_destination(root, product.parent())?;

        let marker_present = match fs::read_dir(&parent) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .any(|entry| entry.file_name() == product.name()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => {
                return Err(MirrorError::ReadFailed {
                    path: parent,
                    source,
                })
            }
        };

        let (file_count, total_bytes) = if marker_present {
            disk_usage(&product_dir)?
        } else {
            (0, 0)
        };

        Ok(Self {
            key: product.key().to_string(),
            product_dir,
            marker_present,
            file_count,
            total_bytes,
        })
    }

    /// Whether the local copy is complete for the given remote totals.
    pub fn matches(&self, remote_files: usize, remote_bytes: u64) -> bool {
        self.marker_present && self.file_count == remote_files && self.total_bytes == remote_bytes
    }
}

/// Count regular files below `path` and sum their sizes.
///
/// A plain file counts as one. A missing path counts as nothing.
pub fn disk_usage(path: &Path) -> MirrorResult<(usize, u64)> {
    let read_err = |path: &Path, source: io::Error| MirrorError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((0, 0)),
        Err(e) => return Err(read_err(path, e)),
    };
    if meta.is_file() {
        return Ok((1, meta.len()));
    }

    let mut files = 0;
    let mut bytes = 0;
    let mut stack = vec![path.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| read_err(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| read_err(&dir, e))?;
            let entry_path = entry.path();
            let meta = fs::metadata(&entry_path).map_err(|e| read_err(&entry_path, e))?;
            if meta.is_dir() {
                stack.push(entry_path);
            } else if meta.is_file() {
                files += 1;
                bytes += meta.len();
            }
        }
    }
    Ok((files, bytes))
}

/// Create `path` and its parents, failing if something other than a
/// directory is in the way.
pub fn ensure_dir(path: &Path) -> MirrorResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(MirrorError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(path).map_err(|source| {
        // create_dir_all reports a file in the middle of the path this way
        if path.ancestors().any(|a| a.is_file()) {
            MirrorError::NotADirectory {
                path: path.to_path_buf(),
            }
        } else {
            MirrorError::CreateDirFailed {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Remove leftover artifact directories under `product_dir`.
///
/// Returns the paths that were removed.
pub fn prune_stale(product_dir: &Path, artifacts: &[String]) -> MirrorResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for artifact in artifacts {
        let path = product_dir.join(artifact);
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else if path.is_file() {
            fs::remove_file(&path)
        } else {
            continue;
        };
        result.map_err(|source| MirrorError::RemoveFailed {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "removed stale artifact");
        removed.push(path);
    }
    Ok(removed)
}

/// Local path for an object key under `root`.
///
/// Keys are relative, `/`-separated and must not climb out of the root.
pub fn object_destination(root: &Path, key: &str) -> MirrorResult<PathBuf> {
    let relative = Path::new(key.trim_start_matches('/'));
    let safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(MirrorError::UnsafeKey {
            key: key.to_string(),
        });
    }
    Ok(root.join(relative))
}
