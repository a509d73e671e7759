//! Ordered failover over a list of candidates.

/// Outcome of [`first_success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failover<T> {
    /// A candidate succeeded after `attempts` tries (including the winner).
    Success { value: T, attempts: usize },
    /// Every candidate failed.
    Exhausted { attempts: usize },
}

/// Try `op` on each candidate in order and stop at the first `Ok`.
///
/// Failures go to `on_failure` and are otherwise dropped. Each candidate is
/// tried at most once; there is no backoff.
pub fn first_success<C, T, E, F, L>(candidates: &[C], mut op: F, mut on_failure: L) -> Failover<T>
where
    F: FnMut(&C) -> Result<T, E>,
    L: FnMut(&C, E),
{
    let mut attempts = 0;
    for candidate in candidates {
        attempts += 1;
        match op(candidate) {
            Ok(value) => return Failover::Success { value, attempts },
            Err(e) => on_failure(candidate, e),
        }
    }
    Failover::Exhausted { attempts }
}
