//! Tests for the mirror reconciler

use super::*;
use crate::catalog::ProductPath;
use crate::store::{ObjectStore, RemoteObject, StoreError, StoreResult};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// In-memory bucket recording listings and downloads.
#[derive(Default)]
struct MemoryStore {
    objects: Vec<(String, Vec<u8>)>,
    listed: Mutex<Vec<String>>,
    downloaded: Mutex<Vec<String>>,
}

impl MemoryStore {
    fn with(mut self, key: &str, size: usize) -> Self {
        self.objects.push((key.to_string(), vec![7u8; size]));
        self
    }

    fn downloads(&self) -> Vec<String> {
        self.downloaded.lock().unwrap().clone()
    }
}

impl ObjectStore for MemoryStore {
    fn list(&self, prefix: &str) -> StoreResult<Vec<RemoteObject>> {
        self.listed.lock().unwrap().push(prefix.to_string());
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| RemoteObject::new(key.clone(), data.len() as u64))
            .collect())
    }

    fn download(&self, key: &str, dest: &Path, progress: &mut dyn FnMut(u64)) -> StoreResult<u64> {
        let (_, data) = self
            .objects
            .iter()
            .find(|(k, _)| k == key)
            .ok_or_else(|| StoreError::Fetch {
                key: key.to_string(),
                reason: "NoSuchKey".to_string(),
            })?;
        self.downloaded.lock().unwrap().push(key.to_string());
        fs::write(dest, data).map_err(|source| StoreError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
        progress(data.len() as u64);
        Ok(data.len() as u64)
    }
}

const PRODUCT: &str = "/eodata/Sentinel-2/MSI/L2A/X.SAFE";

fn product() -> ProductPath {
    ProductPath::from_catalog(PRODUCT, "eodata")
}

fn two_object_store() -> MemoryStore {
    MemoryStore::default()
        .with("Sentinel-2/MSI/L2A/X.SAFE/manifest.safe", 100)
        .with("Sentinel-2/MSI/L2A/X.SAFE/GRANULE/L2A_T32TQM/B02.jp2", 200)
}

fn reconciler(store: MemoryStore) -> MirrorReconciler<MemoryStore> {
    MirrorReconciler::new(
        store,
        MirrorConfig::default().with_progress_interval(std::time::Duration::ZERO),
    )
}

#[test]
fn test_empty_mirror_downloads_everything() {
    let root = TempDir::new().unwrap();
    let mirror = reconciler(two_object_store());

    let synced = mirror.sync(&[product()], root.path(), &|_| {}).unwrap();

    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].decision, SyncDecision::NeedsDownload);
    assert_eq!(synced[0].status(), ProductStatus::Downloaded);
    assert_eq!(synced[0].remote_bytes, 300);
    assert_eq!(synced[0].transferred_bytes, 300);

    let local = LocalMirrorState::inspect(root.path(), &product()).unwrap();
    assert_eq!(local.total_bytes, 300);
    assert!(local.matches(2, 300));
    assert_eq!(mirror.store().downloads().len(), 2);
}

#[test]
fn test_complete_product_is_skipped() {
    let root = TempDir::new().unwrap();
    let mirror = reconciler(two_object_store());
    mirror.sync(&[product()], root.path(), &|_| {}).unwrap();

    let second = reconciler(two_object_store());
    let synced = second.sync(&[product()], root.path(), &|_| {}).unwrap();

    assert_eq!(synced[0].decision, SyncDecision::AlreadyComplete);
    assert_eq!(synced[0].status(), ProductStatus::AlreadyPresent);
    assert_eq!(synced[0].transferred_bytes, 0);
    assert!(second.store().downloads().is_empty());
}

#[test]
fn test_partial_product_is_redownloaded_after_pruning() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("Sentinel-2/MSI/L2A/X.SAFE");
    fs::create_dir_all(dir.join("GRANULE/L2A_T32TQM")).unwrap();
    fs::write(dir.join("manifest.safe"), vec![0u8; 100]).unwrap();
    fs::write(dir.join("GRANULE/L2A_T32TQM/stale.tmp"), vec![0u8; 17]).unwrap();

    let mirror = reconciler(two_object_store());
    let synced = mirror.sync(&[product()], root.path(), &|_| {}).unwrap();

    assert_eq!(synced[0].decision, SyncDecision::NeedsDownload);
    assert!(!dir.join("GRANULE/L2A_T32TQM/stale.tmp").exists());
    assert!(dir.join("GRANULE/L2A_T32TQM/B02.jp2").exists());
    assert_eq!(disk_usage(&dir).unwrap(), (2, 300));
}

#[test]
fn test_same_count_different_bytes_is_redownloaded() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("Sentinel-2/MSI/L2A/X.SAFE");
    fs::create_dir_all(dir.join("GRANULE/L2A_T32TQM")).unwrap();
    fs::write(dir.join("manifest.safe"), vec![0u8; 100]).unwrap();
    fs::write(dir.join("GRANULE/L2A_T32TQM/B02.jp2"), vec![0u8; 150]).unwrap();

    let mirror = reconciler(two_object_store());
    let plan = mirror.plan(&product(), root.path()).unwrap();
    assert_eq!(plan.decision, SyncDecision::NeedsDownload);
    assert_eq!(plan.local.total_bytes, 250);

    mirror.sync(&[product()], root.path(), &|_| {}).unwrap();
    assert_eq!(disk_usage(&dir).unwrap(), (2, 300));
}

#[test]
fn test_plan_does_not_touch_disk() {
    let root = TempDir::new().unwrap();
    let mirror = reconciler(two_object_store());

    let plan = mirror.plan(&product(), root.path()).unwrap();

    assert_eq!(plan.remote_bytes, 300);
    assert_eq!(plan.remote_files, 2);
    assert!(!plan.local.marker_present);
    assert!(fs::read_dir(root.path()).unwrap().next().is_none());
}

#[test]
fn test_missing_product_aborts_batch() {
    let root = TempDir::new().unwrap();
    let mirror = reconciler(two_object_store());
    let missing = ProductPath::from_catalog("/eodata/Sentinel-2/MSI/L2A/GONE.SAFE", "eodata");

    let err = mirror
        .sync(&[missing, product()], root.path(), &|_| {})
        .unwrap_err();

    assert!(matches!(err, MirrorError::ProductNotFound { ref key } if key.ends_with("GONE.SAFE")));
    assert!(mirror.store().downloads().is_empty());
}

#[test]
fn test_sibling_keys_are_not_part_of_product() {
    let root = TempDir::new().unwrap();
    let store = two_object_store().with("Sentinel-2/MSI/L2A/X.SAFE_COPY/manifest.safe", 999);
    let mirror = reconciler(store);

    let plan = mirror.plan(&product(), root.path()).unwrap();

    assert_eq!(plan.remote_bytes, 300);
    assert_eq!(mirror.store().listed.lock().unwrap()[0], "Sentinel-2/MSI/L2A/X.SAFE");
}

#[test]
fn test_directory_markers_create_dirs() {
    let root = TempDir::new().unwrap();
    let store = two_object_store().with("Sentinel-2/MSI/L2A/X.SAFE/HTML/", 0);
    let mirror = reconciler(store);

    mirror.sync(&[product()], root.path(), &|_| {}).unwrap();

    let dir = root.path().join("Sentinel-2/MSI/L2A/X.SAFE");
    assert!(dir.join("HTML").is_dir());
    assert_eq!(mirror.store().downloads().len(), 2);

    // Marker objects carry no file, so the second run still matches
    let again = reconciler(two_object_store().with("Sentinel-2/MSI/L2A/X.SAFE/HTML/", 0));
    let synced = again.sync(&[product()], root.path(), &|_| {}).unwrap();
    assert_eq!(synced[0].decision, SyncDecision::AlreadyComplete);
}

#[test]
fn test_parent_blocked_by_file() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("Sentinel-2/MSI")).unwrap();
    fs::write(root.path().join("Sentinel-2/MSI/L2A"), b"not a dir").unwrap();
    let mirror = reconciler(two_object_store());

    let err = mirror.sync(&[product()], root.path(), &|_| {}).unwrap_err();

    assert!(matches!(err, MirrorError::NotADirectory { .. }));
}

#[test]
fn test_event_sequence() {
    let root = TempDir::new().unwrap();
    let store = two_object_store().with("Sentinel-2/MSI/L2A/Y.SAFE/manifest.safe", 10);
    let mirror = reconciler(store);
    let other = ProductPath::from_catalog("/eodata/Sentinel-2/MSI/L2A/Y.SAFE", "eodata");
    let log = Mutex::new(Vec::new());

    mirror
        .sync(&[product(), other], root.path(), &|e: &SyncEvent| {
            log.lock().unwrap().push(e.clone())
        })
        .unwrap();

    let events = log.into_inner().unwrap();
    assert!(matches!(&events[0], SyncEvent::Queued { product } if product == "X.SAFE"));
    assert!(matches!(&events[1], SyncEvent::Queued { product } if product == "Y.SAFE"));
    assert!(matches!(
        &events[2],
        SyncEvent::Started { product, decision: SyncDecision::NeedsDownload, objects: 2, total_bytes: 300 }
            if product == "X.SAFE"
    ));

    let x_progress: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::Progress { product, bytes, total_bytes, .. } if product == "X.SAFE" => {
                assert_eq!(*total_bytes, 300);
                Some(*bytes)
            }
            _ => None,
        })
        .collect();
    assert_eq!(x_progress.last(), Some(&300));
    assert!(x_progress.windows(2).all(|w| w[0] <= w[1]));

    let finished: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::Finished { product, status } => Some((product.as_str(), *status)),
            _ => None,
        })
        .collect();
    assert_eq!(
        finished,
        vec![
            ("X.SAFE", ProductStatus::Downloaded),
            ("Y.SAFE", ProductStatus::Downloaded)
        ]
    );
}

#[test]
fn test_parallel_objects_give_same_result() {
    let root = TempDir::new().unwrap();
    let mut store = MemoryStore::default();
    for i in 0..8 {
        store = store.with(&format!("Sentinel-2/MSI/L2A/X.SAFE/IMG/B{:02}.jp2", i), 50 + i);
    }
    let mirror = MirrorReconciler::new(
        store,
        MirrorConfig::default().with_parallel_objects(3),
    )
    .with_strategy(Box::new(
        ParallelStrategy::new(3).with_poll_interval(std::time::Duration::from_millis(1)),
    ));

    let synced = mirror.sync(&[product()], root.path(), &|_| {}).unwrap();

    let expected: u64 = (0..8).map(|i| 50 + i as u64).sum();
    assert_eq!(synced[0].transferred_bytes, expected);
    let local = LocalMirrorState::inspect(root.path(), &product()).unwrap();
    assert!(local.matches(8, expected));
}

#[test]
fn test_transfer_failure_names_object() {
    struct BrokenStore;

    impl ObjectStore for BrokenStore {
        fn list(&self, prefix: &str) -> StoreResult<Vec<RemoteObject>> {
            Ok(vec![RemoteObject::new(format!("{}/a.bin", prefix), 5)])
        }

        fn download(&self, key: &str, _dest: &Path, _progress: &mut dyn FnMut(u64)) -> StoreResult<u64> {
            Err(StoreError::Fetch {
                key: key.to_string(),
                reason: "503 Slow Down".to_string(),
            })
        }
    }

    let root = TempDir::new().unwrap();
    let mirror = MirrorReconciler::new(BrokenStore, MirrorConfig::default());

    let err = mirror.sync(&[product()], root.path(), &|_| {}).unwrap_err();

    match err {
        MirrorError::Transfer { product, key, .. } => {
            assert_eq!(product, "X.SAFE");
            assert!(key.ends_with("X.SAFE/a.bin"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_config_builders() {
    let config = MirrorConfig::default()
        .with_stale_artifacts(["GRANULE", "QI_DATA"])
        .with_parallel_objects(0);
    assert_eq!(config.stale_artifacts, vec!["GRANULE", "QI_DATA"]);
    assert_eq!(config.parallel_objects, 1);
    assert_eq!(MirrorConfig::default().stale_artifacts, vec![DEFAULT_STALE_ARTIFACT]);
}
