//! Application configuration for `MirrorSession`.
//!
//! `AppConfig` gathers the per-component configs derived from the INI file
//! so the session can be built from one value, and so tests can build one
//! without touching the user's home directory.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{ResolverConfig, StaticProxySource};
use crate::config::ConfigFile;
use crate::mirror::MirrorConfig;
use crate::store::S3StoreConfig;

/// Configuration combining all component configs.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Catalog endpoint, timeout and bucket prefix.
    pub resolver: ResolverConfig,

    /// Proxy URLs tried in order for catalog requests.
    pub proxy_servers: Vec<String>,

    /// Whether a direct connection follows the proxies.
    pub allow_direct: bool,

    /// Object store endpoint and credentials.
    pub storage: S3StoreConfig,

    /// Reconciler settings.
    pub mirror: MirrorConfig,

    /// Root of the local mirror, if configured.
    pub mirror_root: Option<PathBuf>,

    /// Default collection for searches.
    pub platform: String,

    /// Default product type for searches.
    pub product_type: String,

    /// Default cloud cover ceiling in percent.
    pub cloud_cover: f64,
}

impl AppConfig {
    /// Derive the application configuration from the config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let resolver = ResolverConfig::default()
            .with_endpoint(config.catalog.endpoint.clone())
            .with_timeout(Duration::from_secs(config.catalog.timeout))
            .with_bucket(config.storage.bucket.clone());

        let mut storage = S3StoreConfig::default()
            .with_endpoint(config.storage.endpoint.clone())
            .with_bucket(config.storage.bucket.clone())
            .with_region(config.storage.region.clone());
        if let (Some(access_key), Some(secret_key)) =
            (&config.storage.access_key, &config.storage.secret_key)
        {
            storage = storage.with_credentials(access_key.clone(), secret_key.clone());
        }

        let mirror = MirrorConfig::default()
            .with_stale_artifacts(config.download.stale_artifacts.iter().cloned())
            .with_parallel_objects(config.download.parallel_objects);

        Self {
            resolver,
            proxy_servers: config.proxy.servers.clone(),
            allow_direct: config.proxy.allow_direct,
            storage,
            mirror,
            mirror_root: config.download.directory.clone(),
            platform: config.catalog.platform.clone(),
            product_type: config.catalog.product_type.clone(),
            cloud_cover: config.catalog.cloud_cover,
        }
    }

    /// Proxy candidates for the catalog resolver.
    pub fn proxy_source(&self) -> StaticProxySource {
        StaticProxySource::new(self.proxy_servers.iter().cloned(), self.allow_direct)
    }

    /// Override the mirror root, e.g. from a command-line flag.
    pub fn with_mirror_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.mirror_root = Some(root.into());
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_config_file(&ConfigFile::default())
    }
}
