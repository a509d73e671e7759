//! The region-to-mirror workflow.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use super::config::AppConfig;
use super::error::{AppError, AppResult};
use crate::catalog::{
    CatalogResolver, CatalogTransport, ProductPath, ProxySource, ReqwestCatalogTransport,
    StaticProxySource,
};
use crate::coverage::{self, CoverageReport};
use crate::geometry::{Crs, Grid, Region};
use crate::mirror::{MirrorReconciler, ProductPlan, SyncDecision, SyncEvent, SyncedProduct};
use crate::query::{SearchQuery, ValidationError};
use crate::store::{ObjectStore, S3ObjectStore};

/// Session wired to the real HTTP catalog transport and S3 object store.
pub type ReqwestMirrorSession =
    MirrorSession<ReqwestCatalogTransport, StaticProxySource, S3ObjectStore>;

/// Search parameters other than the footprint, which comes from the region.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub platform: String,
    pub product_type: String,
    pub cloud_cover_ceiling: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchRequest {
    /// Request using the configured platform, product type and cloud cover.
    pub fn from_config(config: &AppConfig, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            platform: config.platform.clone(),
            product_type: config.product_type.clone(),
            cloud_cover_ceiling: config.cloud_cover,
            start_date,
            end_date,
        }
    }

    /// Build the catalog query for `region`.
    ///
    /// The footprint is the region's bounding rectangle, which the catalog
    /// expects in EPSG:4326.
    pub fn query_for(&self, region: &Region) -> AppResult<SearchQuery> {
        if region.crs() != Crs::WGS84 {
            return Err(ValidationError::InvalidField {
                field: "footprint",
                reason: format!("region must be in {}, found {}", Crs::WGS84, region.crs()),
            }
            .into());
        }
        let query = SearchQuery::builder()
            .platform(self.platform.clone())
            .product_type(self.product_type.clone())
            .cloud_cover_ceiling(self.cloud_cover_ceiling)
            .footprint(region.footprint_wkt()?)
            .start_date(self.start_date)
            .end_date(self.end_date)
            .build()?;
        Ok(query)
    }
}

/// Outcome of the catalog stages.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub coverage: CoverageReport,
    pub query: SearchQuery,
    pub products: Vec<ProductPath>,
}

/// Outcome of a complete run.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub resolution: Resolution,
    pub synced: Vec<SyncedProduct>,
}

impl SessionSummary {
    /// Products that had to be transferred.
    pub fn downloaded(&self) -> usize {
        self.synced
            .iter()
            .filter(|s| s.decision == SyncDecision::NeedsDownload)
            .count()
    }

    /// Products found complete and skipped.
    pub fn skipped(&self) -> usize {
        self.synced.len() - self.downloaded()
    }

    /// Bytes written during this run.
    pub fn transferred_bytes(&self) -> u64 {
        self.synced.iter().map(|s| s.transferred_bytes).sum()
    }
}

/// Runs selection, search, matching and reconciliation against one mirror root.
pub struct MirrorSession<T, P, S> {
    resolver: CatalogResolver<T, P>,
    reconciler: MirrorReconciler<S>,
    root: PathBuf,
}

impl ReqwestMirrorSession {
    /// Connect the real transports described by `config`.
    ///
    /// # Errors
    ///
    /// [`AppError::Config`] when no mirror root is configured, or a store
    /// setup error.
    pub fn connect(config: &AppConfig) -> AppResult<Self> {
        let root = config.mirror_root.clone().ok_or_else(|| {
            AppError::Config(
                "no mirror directory; set download.directory or pass --output".to_string(),
            )
        })?;
        let resolver = CatalogResolver::new(
            ReqwestCatalogTransport,
            config.proxy_source(),
            config.resolver.clone(),
        );
        let store = S3ObjectStore::connect(&config.storage)?;
        let reconciler = MirrorReconciler::new(store, config.mirror.clone());
        Ok(Self::new(resolver, reconciler, root))
    }
}

impl<T: CatalogTransport, P: ProxySource, S: ObjectStore> MirrorSession<T, P, S> {
    pub fn new(
        resolver: CatalogResolver<T, P>,
        reconciler: MirrorReconciler<S>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            reconciler,
            root: root.into(),
        }
    }

    /// Local mirror root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &CatalogResolver<T, P> {
        &self.resolver
    }

    pub fn reconciler(&self) -> &MirrorReconciler<S> {
        &self.reconciler
    }

    /// Select tiles covering `region` and resolve their catalog products.
    ///
    /// Validation happens before any request is sent.
    pub fn resolve(
        &self,
        region: &Region,
        grid: &Grid,
        request: &SearchRequest,
    ) -> AppResult<Resolution> {
        let coverage = coverage::select_with_report(region, grid)?;
        let query = request.query_for(region)?;

        info!(
            tiles = coverage.selection.len(),
            candidates = coverage.candidates,
            coverage_pct = coverage.coverage_ratio() * 100.0,
            "tiles selected"
        );

        let products = self.resolver.resolve(&query, &coverage.selection)?;
        Ok(Resolution {
            coverage,
            query,
            products,
        })
    }

    /// Compare `products` with the local mirror without changing it.
    pub fn plan(&self, products: &[ProductPath]) -> AppResult<Vec<ProductPlan>> {
        products
            .iter()
            .map(|product| {
                self.reconciler
                    .plan(product, &self.root)
                    .map_err(AppError::from)
            })
            .collect()
    }

    /// Reconcile `products` into the mirror root.
    pub fn sync(
        &self,
        products: &[ProductPath],
        on_event: &dyn Fn(&SyncEvent),
    ) -> AppResult<Vec<SyncedProduct>> {
        Ok(self.reconciler.sync(products, &self.root, on_event)?)
    }

    /// Resolve and then sync, stopping at the first error.
    pub fn run(
        &self,
        region: &Region,
        grid: &Grid,
        request: &SearchRequest,
        on_event: &dyn Fn(&SyncEvent),
    ) -> AppResult<SessionSummary> {
        let resolution = self.resolve(region, grid, request)?;
        let synced = self.sync(&resolution.products, on_event)?;

        let summary = SessionSummary { resolution, synced };
        info!(
            products = summary.synced.len(),
            downloaded = summary.downloaded(),
            skipped = summary.skipped(),
            bytes = summary.transferred_bytes(),
            root = %self.root.display(),
            "session complete"
        );
        Ok(summary)
    }
}
