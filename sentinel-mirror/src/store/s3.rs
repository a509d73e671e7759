//! S3-compatible object store adapter.
//!
//! The AWS SDK is async; the mirror is not. The adapter owns a small Tokio
//! runtime and blocks on it for every call, which also makes it safe to use
//! from several transfer threads at once.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};
use super::{ObjectStore, RemoteObject};
use crate::catalog::DEFAULT_BUCKET;

/// Default Copernicus Data Space object store endpoint.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://eodata.dataspace.copernicus.eu/";

/// Region name expected by the Copernicus endpoint.
pub const DEFAULT_STORAGE_REGION: &str = "default";

const RUNTIME_THREADS: usize = 2;

/// Connection settings for [`S3ObjectStore`].
#[derive(Clone)]
pub struct S3StoreConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    /// Static credentials. When either key is missing the SDK's default
    /// provider chain is used instead.
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_STORAGE_REGION.to_string(),
            access_key: None,
            secret_key: None,
        }
    }
}

impl fmt::Debug for S3StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key.as_ref().map(|_| "<set>"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl S3StoreConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    fn static_credentials(&self) -> Option<Credentials> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some(Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "sentinel-mirror-config",
            )),
            _ => None,
        }
    }
}

/// Blocking [`ObjectStore`] over an S3-compatible endpoint.
pub struct S3ObjectStore {
    runtime: tokio::runtime::Runtime,
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build the client for `config`.
    ///
    /// No request is made here; bad credentials surface on the first listing.
    pub fn connect(config: &S3StoreConfig) -> StoreResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(RUNTIME_THREADS)
            .thread_name("sentinel-mirror-s3")
            .enable_all()
            .build()
            .map_err(|e| StoreError::Setup(format!("failed to create runtime: {}", e)))?;

        let client = runtime.block_on(Self::build_client(config));

        info!(
            endpoint = %config.endpoint,
            bucket = %config.bucket,
            static_credentials = config.access_key.is_some() && config.secret_key.is_some(),
            "object store client initialized"
        );

        Ok(Self {
            runtime,
            client,
            bucket: config.bucket.clone(),
        })
    }

    async fn build_client(config: &S3StoreConfig) -> S3Client {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(credentials) = config.static_credentials() {
            loader = loader.credentials_provider(credentials);
        }
        let shared = loader.load().await;

        // Path-style addressing: the bucket is not a DNS label on this endpoint
        let s3_config = S3ConfigBuilder::from(&shared)
            .endpoint_url(&config.endpoint)
            .force_path_style(true)
            .build();

        S3Client::from_conf(s3_config)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    fn list(&self, prefix: &str) -> StoreResult<Vec<RemoteObject>> {
        self.runtime.block_on(async {
            let mut objects = Vec::new();
            let mut token: Option<String> = None;
            let mut pages = 0usize;

            loop {
                let mut req = self
                    .client
                    .list_objects_v2()
                    .bucket(&self.bucket)
                    .prefix(prefix);
                if let Some(t) = token.as_deref() {
                    req = req.continuation_token(t);
                }
                let resp = req.send().await.map_err(|e| StoreError::List {
                    prefix: prefix.to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                })?;
                pages += 1;

                for obj in resp.contents.unwrap_or_default() {
                    let Some(key) = obj.key else { continue };
                    let size = obj.size.unwrap_or(0).max(0) as u64;
                    objects.push(RemoteObject { key, size });
                }

                if resp.is_truncated.unwrap_or(false) {
                    token = resp.next_continuation_token;
                    if token.is_none() {
                        break;
                    }
                } else {
                    break;
                }
            }

            debug!(prefix, pages, objects = objects.len(), "listed objects");
            Ok(objects)
        })
    }

    fn download(&self, key: &str, dest: &Path, progress: &mut dyn FnMut(u64)) -> StoreResult<u64> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| StoreError::Fetch {
                    key: key.to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                })?;

            let write_err = |source: std::io::Error| StoreError::Write {
                path: dest.to_path_buf(),
                source,
            };
            let mut file = File::create(dest).map_err(write_err)?;
            let mut body = resp.body;
            let mut written = 0u64;

            while let Some(chunk) = body.try_next().await.map_err(|e| StoreError::Fetch {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })? {
                file.write_all(&chunk).map_err(write_err)?;
                written += chunk.len() as u64;
                progress(chunk.len() as u64);
            }
            file.flush().map_err(write_err)?;

            Ok(written)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = S3StoreConfig::default();
        assert_eq!(config.endpoint, "https://eodata.dataspace.copernicus.eu/");
        assert_eq!(config.bucket, "eodata");
        assert_eq!(config.region, "default");
        assert!(config.static_credentials().is_none());
    }

    #[test]
    fn test_partial_credentials_fall_back_to_chain() {
        let mut config = S3StoreConfig::default();
        config.access_key = Some("AKIA".to_string());
        assert!(config.static_credentials().is_none());

        let config = config.with_credentials("AKIA", "secret");
        assert!(config.static_credentials().is_some());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = S3StoreConfig::default().with_credentials("AKIA123", "topsecret");
        let text = format!("{:?}", config);
        assert!(!text.contains("AKIA123"));
        assert!(!text.contains("topsecret"));
        assert!(text.contains("<set>"));
    }

    #[test]
    fn test_builder() {
        let config = S3StoreConfig::default()
            .with_endpoint("http://localhost:9000")
            .with_bucket("mirror")
            .with_region("eu-central-1");
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.bucket, "mirror");
        assert_eq!(config.region, "eu-central-1");
    }
}
