//! Transfer strategies for the objects of one product.
//!
//! Sequential transfer is the reference behaviour. The parallel strategy
//! spreads objects over a bounded set of scoped worker threads and keeps
//! byte accounting in atomic counters that the calling thread polls.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::error::{MirrorError, MirrorResult};
use super::progress::TransferCounters;
use crate::store::ObjectStore;

/// One object to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub key: String,
    pub size: u64,
    pub dest: PathBuf,
}

/// Strategy for transferring a product's objects.
pub trait TransferStrategy: Send + Sync {
    /// Fetch every transfer, stopping at the first failure.
    ///
    /// `on_progress` receives the cumulative number of bytes written for
    /// the whole batch. Returns the final byte count.
    fn execute(
        &self,
        store: &dyn ObjectStore,
        product: &str,
        transfers: &[Transfer],
        on_progress: &mut dyn FnMut(u64),
    ) -> MirrorResult<u64>;
}

/// Transfers objects one at a time, in listing order.
#[derive(Debug, Default)]
pub struct SequentialStrategy;

impl SequentialStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl TransferStrategy for SequentialStrategy {
    fn execute(
        &self,
        store: &dyn ObjectStore,
        product: &str,
        transfers: &[Transfer],
        on_progress: &mut dyn FnMut(u64),
    ) -> MirrorResult<u64> {
        let mut total = 0u64;

        for transfer in transfers {
            let mut on_chunk = |bytes: u64| {
                total += bytes;
                on_progress(total);
            };
            store
                .download(&transfer.key, &transfer.dest, &mut on_chunk)
                .map_err(|source| MirrorError::Transfer {
                    product: product.to_string(),
                    key: transfer.key.clone(),
                    source,
                })?;
        }

        Ok(total)
    }
}

/// Transfers up to `concurrency` objects at once.
#[derive(Debug)]
pub struct ParallelStrategy {
    /// Maximum number of concurrent transfers.
    pub concurrency: usize,
    /// How often the calling thread reports progress.
    pub poll_interval: Duration,
}

impl ParallelStrategy {
    /// Create a new parallel strategy (minimum concurrency 1).
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ParallelStrategy {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TransferStrategy for ParallelStrategy {
    fn execute(
        &self,
        store: &dyn ObjectStore,
        product: &str,
        transfers: &[Transfer],
        on_progress: &mut dyn FnMut(u64),
    ) -> MirrorResult<u64> {
        let counters = TransferCounters::new(transfers.len());
        let next = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let failure: Mutex<Option<MirrorError>> = Mutex::new(None);
        let workers = self.concurrency.min(transfers.len());
        let (counters_ref, next, abort, failure_slot) = (&counters, &next, &abort, &failure);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || loop {
                        if abort.load(Ordering::SeqCst) {
                            break;
                        }
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        let Some(transfer) = transfers.get(index) else {
                            break;
                        };

                        let mut on_chunk = |bytes: u64| counters_ref.add(index, bytes);
                        match store.download(&transfer.key, &transfer.dest, &mut on_chunk) {
                            Ok(bytes) => counters_ref.mark_completed(index, bytes),
                            Err(source) => {
                                abort.store(true, Ordering::SeqCst);
                                if let Ok(mut slot) = failure_slot.lock() {
                                    slot.get_or_insert(MirrorError::Transfer {
                                        product: product.to_string(),
                                        key: transfer.key.clone(),
                                        source,
                                    });
                                }
                                break;
                            }
                        }
                    })
                })
                .collect();

            while !handles.iter().all(|h| h.is_finished()) {
                on_progress(counters.total_bytes());
                thread::sleep(self.poll_interval);
            }
        });

        let failure = match failure.into_inner() {
            Ok(failure) => failure,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(err) = failure {
            return Err(err);
        }

        let total = counters.total_bytes();
        on_progress(total);
        Ok(total)
    }
}

/// Strategy for a configured object concurrency.
pub fn strategy_for(parallel_objects: usize) -> Box<dyn TransferStrategy> {
    if parallel_objects > 1 {
        Box::new(ParallelStrategy::new(parallel_objects))
    } else {
        Box::new(SequentialStrategy::new())
    }
}
