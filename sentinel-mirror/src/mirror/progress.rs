//! Progress reporting for mirror synchronisation.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::reconciler::SyncDecision;

/// Callback receiving [`SyncEvent`]s.
pub type SyncEventCallback = Box<dyn Fn(&SyncEvent) + Send + Sync>;

/// Per-product status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    /// Matched by the catalog, not processed yet.
    NeedsDownload,
    /// Objects are being transferred.
    Downloading,
    /// The local copy was already complete.
    AlreadyPresent,
    /// The product was transferred in this run.
    Downloaded,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsDownload => "needs download",
            Self::Downloading => "downloading",
            Self::AlreadyPresent => "already present",
            Self::Downloaded => "downloaded",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle notifications emitted by
/// [`MirrorReconciler::sync`](super::MirrorReconciler::sync).
///
/// Every product gets a `Queued` event before any work starts, followed
/// later by `Started`, zero or more `Progress`, and `Finished`.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Queued {
        product: String,
    },
    Started {
        product: String,
        decision: SyncDecision,
        objects: usize,
        total_bytes: u64,
    },
    Progress {
        product: String,
        bytes: u64,
        total_bytes: u64,
        /// Throughput since the product started.
        bytes_per_sec: f64,
    },
    Finished {
        product: String,
        status: ProductStatus,
    },
}

impl SyncEvent {
    /// Name of the product the event refers to.
    pub fn product(&self) -> &str {
        match self {
            Self::Queued { product }
            | Self::Started { product, .. }
            | Self::Progress { product, .. }
            | Self::Finished { product, .. } => product,
        }
    }

    /// Status a front end should display after this event.
    pub fn status(&self) -> ProductStatus {
        match self {
            Self::Queued { .. } => ProductStatus::NeedsDownload,
            Self::Started {
                decision: SyncDecision::AlreadyComplete,
                ..
            } => ProductStatus::AlreadyPresent,
            Self::Started { .. } | Self::Progress { .. } => ProductStatus::Downloading,
            Self::Finished { status, .. } => *status,
        }
    }
}

/// Byte counters shared by transfer workers.
#[derive(Debug)]
pub struct TransferCounters {
    object_bytes: Vec<AtomicU64>,
    objects_completed: AtomicUsize,
}

impl TransferCounters {
    pub fn new(objects: usize) -> Self {
        Self {
            object_bytes: (0..objects).map(|_| AtomicU64::new(0)).collect(),
            objects_completed: AtomicUsize::new(0),
        }
    }

    /// Add a chunk to an object's running total.
    pub fn add(&self, index: usize, bytes: u64) {
        if let Some(counter) = self.object_bytes.get(index) {
            counter.fetch_add(bytes, Ordering::SeqCst);
        }
    }

    /// Record an object as fully written with `final_bytes`.
    pub fn mark_completed(&self, index: usize, final_bytes: u64) {
        if let Some(counter) = self.object_bytes.get(index) {
            counter.store(final_bytes, Ordering::SeqCst);
            self.objects_completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.object_bytes
            .iter()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    pub fn completed_objects(&self) -> usize {
        self.objects_completed.load(Ordering::SeqCst)
    }
}

/// Rate limiter for progress events.
#[derive(Debug)]
pub struct ProgressThrottle {
    started: Instant,
    last: Option<Instant>,
    interval: Duration,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            started: Instant::now(),
            last: None,
            interval,
        }
    }

    /// Whether enough time has passed since the last accepted report.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Average rate of `bytes` since the throttle was created.
    pub fn rate(&self, bytes: u64) -> f64 {
        let secs = self.started.elapsed().as_secs_f64();
        if secs > 0.0 {
            bytes as f64 / secs
        } else {
            0.0
        }
    }
}
