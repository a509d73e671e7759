//! Per-product reconciliation of the local mirror against the object store.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::{MirrorError, MirrorResult};
use super::local::{ensure_dir, object_destination, prune_stale, LocalMirrorState};
use super::progress::{ProductStatus, ProgressThrottle, SyncEvent};
use super::strategy::{strategy_for, Transfer, TransferStrategy};
use crate::catalog::ProductPath;
use crate::store::{ObjectStore, RemoteObject};

/// Directory left behind by an interrupted extraction by default.
pub const DEFAULT_STALE_ARTIFACT: &str = "GRANULE";

/// What to do with a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Local copy matches the remote listing; nothing to transfer.
    AlreadyComplete,
    /// Missing or mismatched; the whole object set is fetched again.
    NeedsDownload,
}

/// Configuration for [`MirrorReconciler`].
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Directory names under a product removed before it is redownloaded.
    pub stale_artifacts: Vec<String>,

    /// Objects transferred concurrently within one product.
    pub parallel_objects: usize,

    /// Minimum spacing of progress events.
    pub progress_interval: Duration,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            stale_artifacts: vec![DEFAULT_STALE_ARTIFACT.to_string()],
            parallel_objects: 1,
            progress_interval: Duration::from_millis(100),
        }
    }
}

impl MirrorConfig {
    /// Set the stale artifact directory names.
    pub fn with_stale_artifacts<I, S>(mut self, artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stale_artifacts = artifacts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the object concurrency (minimum 1).
    pub fn with_parallel_objects(mut self, parallel: usize) -> Self {
        self.parallel_objects = parallel.max(1);
        self
    }

    /// Set the progress event spacing.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Remote and local view of one product, and the resulting decision.
#[derive(Debug, Clone)]
pub struct ProductPlan {
    pub product: ProductPath,
    /// Objects under the product key, in listing order.
    pub objects: Vec<RemoteObject>,
    /// Sum of all object sizes.
    pub remote_bytes: u64,
    /// Objects that are files rather than directory markers.
    pub remote_files: usize,
    pub local: LocalMirrorState,
    pub decision: SyncDecision,
}

/// Outcome for one product of a [`MirrorReconciler::sync`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedProduct {
    pub product: ProductPath,
    pub decision: SyncDecision,
    /// Bytes the product occupies remotely.
    pub remote_bytes: u64,
    /// Bytes transferred in this run.
    pub transferred_bytes: u64,
}

impl SyncedProduct {
    pub fn status(&self) -> ProductStatus {
        match self.decision {
            SyncDecision::AlreadyComplete => ProductStatus::AlreadyPresent,
            SyncDecision::NeedsDownload => ProductStatus::Downloaded,
        }
    }
}

/// Brings the local mirror in line with the object store, product by
/// product.
///
/// A single writer per mirror root is assumed; two reconcilers on the same
/// root race on the stale-artifact cleanup and on partially written files.
pub struct MirrorReconciler<S> {
    store: S,
    config: MirrorConfig,
    strategy: Box<dyn TransferStrategy>,
}

impl<S: ObjectStore> MirrorReconciler<S> {
    /// Create a reconciler, picking the transfer strategy from the config.
    pub fn new(store: S, config: MirrorConfig) -> Self {
        let strategy = strategy_for(config.parallel_objects);
        Self {
            store,
            config,
            strategy,
        }
    }

    /// Replace the transfer strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn TransferStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compare the remote listing with the mirror under `root` without
    /// changing anything on disk.
    ///
    /// # Errors
    ///
    /// [`MirrorError::ProductNotFound`] when nothing is listed under the key.
    pub fn plan(&self, product: &ProductPath, root: &Path) -> MirrorResult<ProductPlan> {
        let objects = self.list_product(product)?;
        let remote_bytes: u64 = objects.iter().map(|o| o.size).sum();
        let remote_files = objects.iter().filter(|o| !o.is_directory_marker()).count();
        let local = LocalMirrorState::inspect(root, product)?;

        let decision = if local.matches(remote_files, remote_bytes) {
            SyncDecision::AlreadyComplete
        } else {
            SyncDecision::NeedsDownload
        };

        debug!(
            product = product.name(),
            remote_bytes,
            remote_files,
            local_bytes = local.total_bytes,
            local_files = local.file_count,
            marker = local.marker_present,
            ?decision,
            "planned product"
        );

        Ok(ProductPlan {
            product: product.clone(),
            objects,
            remote_bytes,
            remote_files,
            local,
            decision,
        })
    }

    /// Reconcile every product under `root`, strictly in order.
    ///
    /// The first failing product aborts the batch.
    pub fn sync(
        &self,
        products: &[ProductPath],
        root: &Path,
        on_event: &dyn Fn(&SyncEvent),
    ) -> MirrorResult<Vec<SyncedProduct>> {
        for product in products {
            on_event(&SyncEvent::Queued {
                product: product.name().to_string(),
            });
        }

        let mut synced = Vec::with_capacity(products.len());
        for product in products {
            synced.push(self.sync_product(product, root, on_event)?);
        }

        let downloaded = synced
            .iter()
            .filter(|s| s.decision == SyncDecision::NeedsDownload)
            .count();
        info!(
            products = synced.len(),
            downloaded,
            skipped = synced.len() - downloaded,
            "mirror sync complete"
        );
        Ok(synced)
    }

    fn sync_product(
        &self,
        product: &ProductPath,
        root: &Path,
        on_event: &dyn Fn(&SyncEvent),
    ) -> MirrorResult<SyncedProduct> {
        let name = product.name().to_string();
        ensure_dir(&object_destination(root, product.parent())?)?;

        let plan = self.plan(product, root)?;
        on_event(&SyncEvent::Started {
            product: name.clone(),
            decision: plan.decision,
            objects: plan.objects.len(),
            total_bytes: plan.remote_bytes,
        });

        let transferred_bytes = match plan.decision {
            SyncDecision::AlreadyComplete => {
                info!(product = %name, "product already present");
                on_event(&SyncEvent::Finished {
                    product: name,
                    status: ProductStatus::AlreadyPresent,
                });
                0
            }
            SyncDecision::NeedsDownload => {
                info!(
                    product = %name,
                    bytes = plan.remote_bytes,
                    objects = plan.objects.len(),
                    "downloading product"
                );
                let bytes = self.download(&plan, root, on_event)?;
                self.verify(&plan, root)?;
                on_event(&SyncEvent::Finished {
                    product: name,
                    status: ProductStatus::Downloaded,
                });
                bytes
            }
        };

        Ok(SyncedProduct {
            product: product.clone(),
            decision: plan.decision,
            remote_bytes: plan.remote_bytes,
            transferred_bytes,
        })
    }

    fn list_product(&self, product: &ProductPath) -> MirrorResult<Vec<RemoteObject>> {
        let key = product.key();
        let listed = self
            .store
            .list(key)
            .map_err(|source| MirrorError::Listing {
                key: key.to_string(),
                source,
            })?;

        // A prefix listing also returns siblings such as `X.SAFE_1`
        let objects: Vec<_> = listed
            .into_iter()
            .filter(|o| o.key == key || o.key.strip_prefix(key).is_some_and(|r| r.starts_with('/')))
            .collect();

        if objects.is_empty() {
            return Err(MirrorError::ProductNotFound {
                key: key.to_string(),
            });
        }
        Ok(objects)
    }

    fn download(
        &self,
        plan: &ProductPlan,
        root: &Path,
        on_event: &dyn Fn(&SyncEvent),
    ) -> MirrorResult<u64> {
        let name = plan.product.name();
        prune_stale(&plan.local.product_dir, &self.config.stale_artifacts)?;

        let mut transfers = Vec::with_capacity(plan.remote_files);
        for object in &plan.objects {
            let dest = object_destination(root, &object.key)?;
            if object.is_directory_marker() {
                ensure_dir(&dest)?;
                continue;
            }
            if let Some(parent) = dest.parent() {
                ensure_dir(parent)?;
            }
            transfers.push(Transfer {
                key: object.key.clone(),
                size: object.size,
                dest,
            });
        }

        let mut throttle = ProgressThrottle::new(self.config.progress_interval);
        let total_bytes = plan.remote_bytes;
        let mut report = |bytes: u64| {
            if throttle.ready() || bytes == total_bytes {
                on_event(&SyncEvent::Progress {
                    product: name.to_string(),
                    bytes,
                    total_bytes,
                    bytes_per_sec: throttle.rate(bytes),
                });
            }
        };

        self.strategy
            .execute(&self.store, name, &transfers, &mut report)
    }

    /// Re-inspect after a download. A mismatch is logged, not fatal: the
    /// next run sees it and downloads again.
    fn verify(&self, plan: &ProductPlan, root: &Path) -> MirrorResult<()> {
        let local = LocalMirrorState::inspect(root, &plan.product)?;
        if !local.matches(plan.remote_files, plan.remote_bytes) {
            warn!(
                product = plan.product.name(),
                expected_bytes = plan.remote_bytes,
                local_bytes = local.total_bytes,
                expected_files = plan.remote_files,
                local_files = local.file_count,
                "local copy does not match remote listing after download"
            );
        }
        Ok(())
    }
}
