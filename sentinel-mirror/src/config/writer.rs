//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::{ENV_ACCESS_KEY, ENV_SECRET_KEY, MAX_PARALLEL_OBJECTS};
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let access_key = config.storage.access_key.as_deref().unwrap_or("");
    let secret_key = config.storage.secret_key.as_deref().unwrap_or("");
    let directory = config
        .download
        .directory
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let allow_direct = if config.proxy.allow_direct {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[catalog]
; OData products endpoint of the Copernicus Data Space catalog
endpoint = {}
; Timeout in seconds for each catalog request (default: 60)
timeout = {}
; Default collection and product type for searches
platform = {}
product_type = {}
; Default cloud cover ceiling in percent, products at or above it are skipped
cloud_cover = {}

[storage]
; S3-compatible object store holding the products
endpoint = {}
bucket = {}
region = {}
; Object store credentials (Copernicus Data Space S3 keys)
; Overridden by the {} and {} environment variables.
; If empty, the standard AWS credential chain is used.
access_key = {}
secret_key = {}

[proxy]
; Comma separated proxy URLs tried in order for catalog requests
; Example: servers = http://10.0.0.1:3128, http://10.0.0.2:8080
servers = {}
; Try a direct connection after the proxies (default: true)
allow_direct = {}

[download]
; Root directory of the local mirror
directory = {}
; Objects transferred concurrently within one product (1-{}, default: 1)
parallel_objects = {}
; Comma separated directory names removed from an incomplete product before
; it is downloaded again (default: GRANULE)
stale_artifacts = {}

[logging]
; Log file path
file = {}
"#,
        config.catalog.endpoint,
        config.catalog.timeout,
        config.catalog.platform,
        config.catalog.product_type,
        config.catalog.cloud_cover,
        config.storage.endpoint,
        config.storage.bucket,
        config.storage.region,
        ENV_ACCESS_KEY,
        ENV_SECRET_KEY,
        access_key,
        secret_key,
        config.proxy.servers.join(", "),
        allow_direct,
        directory,
        MAX_PARALLEL_OBJECTS,
        config.download.parallel_objects,
        config.download.stale_artifacts.join(", "),
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
