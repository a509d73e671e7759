//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Catalog search settings
    pub catalog: CatalogSettings,
    /// Object store settings
    pub storage: StorageSettings,
    /// Proxy candidates for catalog requests
    pub proxy: ProxySettings,
    /// Local mirror and transfer settings
    pub download: DownloadSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// OData products endpoint
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout: u64,
    /// Default collection name
    pub platform: String,
    /// Default product type
    pub product_type: String,
    /// Default cloud cover ceiling in percent
    pub cloud_cover: f64,
}

/// Object store configuration.
#[derive(Clone, PartialEq)]
pub struct StorageSettings {
    /// S3-compatible endpoint URL
    pub endpoint: String,
    /// Bucket holding the products
    pub bucket: String,
    /// Signing region
    pub region: String,
    /// Access key id
    pub access_key: Option<String>,
    /// Secret access key
    pub secret_key: Option<String>,
}

impl std::fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSettings")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key.as_ref().map(|_| "<set>"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxySettings {
    /// Proxy URLs tried in order
    pub servers: Vec<String>,
    /// Whether a direct connection is tried after the proxies
    pub allow_direct: bool,
}

/// Download configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Mirror root directory
    pub directory: Option<PathBuf>,
    /// Objects transferred concurrently within one product
    pub parallel_objects: usize,
    /// Directories removed from a product before it is redownloaded
    pub stale_artifacts: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
