//! Mirror reconciler: decides per product whether the local copy can be
//! kept or must be fetched again, and performs the transfer.
//!
//! # Decision rule
//!
//! A product is complete only when all of the following hold:
//! - an entry named after the product exists in its parent directory
//! - the number of local files equals the number of remote file objects
//! - the local byte total equals the remote byte total
//!
//! Anything else triggers a full redownload of the product's objects, after
//! removing leftover extraction directories (`GRANULE` by default). Byte
//! totals are the only integrity check; there are no checksums.

mod error;
mod local;
mod progress;
mod reconciler;
mod strategy;

pub use error::{MirrorError, MirrorResult};
pub use local::{disk_usage, ensure_dir, object_destination, prune_stale, LocalMirrorState};
pub use progress::{ProductStatus, SyncEvent, SyncEventCallback, TransferCounters};
pub use reconciler::{
    MirrorConfig, MirrorReconciler, ProductPlan, SyncDecision, SyncedProduct,
    DEFAULT_STALE_ARTIFACT,
};
pub use strategy::{strategy_for, ParallelStrategy, SequentialStrategy, Transfer, TransferStrategy};

#[cfg(test)]
mod tests;
