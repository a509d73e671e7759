//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::settings::*;
use crate::catalog::{DEFAULT_BUCKET, DEFAULT_CATALOG_ENDPOINT, DEFAULT_CATALOG_TIMEOUT};
use crate::mirror::DEFAULT_STALE_ARTIFACT;
use crate::query::{DEFAULT_PLATFORM, DEFAULT_PRODUCT_TYPE};
use crate::store::{DEFAULT_STORAGE_ENDPOINT, DEFAULT_STORAGE_REGION};

/// Default catalog timeout in seconds.
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = DEFAULT_CATALOG_TIMEOUT.as_secs();

/// Default cloud cover ceiling in percent.
pub const DEFAULT_CLOUD_COVER: f64 = 30.0;

/// Default number of concurrent object transfers.
pub const DEFAULT_PARALLEL_OBJECTS: usize = 1;

/// Upper bound for concurrent object transfers.
pub const MAX_PARALLEL_OBJECTS: usize = 32;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "sentinel-mirror.log";

/// Environment variable overriding `storage.access_key`.
pub const ENV_ACCESS_KEY: &str = "SENTINEL_MIRROR_ACCESS_KEY";

/// Environment variable overriding `storage.secret_key`.
pub const ENV_SECRET_KEY: &str = "SENTINEL_MIRROR_SECRET_KEY";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings {
                endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
                timeout: DEFAULT_CATALOG_TIMEOUT_SECS,
                platform: DEFAULT_PLATFORM.to_string(),
                product_type: DEFAULT_PRODUCT_TYPE.to_string(),
                cloud_cover: DEFAULT_CLOUD_COVER,
            },
            storage: StorageSettings {
                endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
                bucket: DEFAULT_BUCKET.to_string(),
                region: DEFAULT_STORAGE_REGION.to_string(),
                access_key: None,
                secret_key: None,
            },
            proxy: ProxySettings {
                servers: Vec::new(),
                allow_direct: true,
            },
            download: DownloadSettings {
                directory: None,
                parallel_objects: DEFAULT_PARALLEL_OBJECTS,
                stale_artifacts: vec![DEFAULT_STALE_ARTIFACT.to_string()],
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE),
            },
        }
    }
}
