//! Scoped sequence allocation against a counter store.
//!
//! The allocator owns the one read-increment-write cycle in the system.
//! Counters are partitioned per scope key; each successful allocation
//! durably advances exactly one counter by exactly one.

use std::sync::Arc;

use dashmap::DashMap;

use super::error::{CounterStoreError, SerialNumberError};
use super::format::count_capacity;
use super::scope::ScopeKey;

/// Persisted counter store for serial number sequences.
///
/// Implementations must make `commit` conditional: the write happens only
/// if the stored value still equals `current`, otherwise the store reports
/// [`CounterStoreError::Conflict`]. A backend with a native atomic
/// increment primitive satisfies the same contract trivially. Writes must
/// be durable before `commit` returns.
pub trait CounterStore: Send + Sync {
    /// Returns the last allocated value for a scope, 0 if none exists yet.
    fn load(&self, scope: &ScopeKey) -> Result<u64, CounterStoreError>;

    /// Writes `next` if the stored value still equals `current`.
    fn commit(&self, scope: &ScopeKey, current: u64, next: u64) -> Result<(), CounterStoreError>;
}

/// Commit attempts before a conflict surfaces to the caller.
const DEFAULT_RETRY_BUDGET: u32 = 5;

/// Allocates monotonically increasing, gap-free counts per scope key.
pub struct SequenceAllocator<S: CounterStore> {
    store: Arc<S>,
    retry_budget: u32,
}

impl<S: CounterStore> SequenceAllocator<S> {
    /// Creates an allocator over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    /// Sets the number of commit attempts before giving up on a conflict.
    #[must_use]
    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget.max(1);
        self
    }

    /// Returns the next count for the scope.
    ///
    /// Reads the current value, verifies that the incremented value still
    /// fits a `count_width`-digit field, and commits. The overflow check
    /// runs before the write, so a failed allocation never advances the
    /// counter.
    ///
    /// # Errors
    ///
    /// - `CounterOverflow` when the next value has more than `count_width`
    ///   digits; fatal for the scope until the format is widened.
    /// - `AllocationConflict` when the store keeps reporting write
    ///   conflicts past the retry budget; the caller may retry the whole
    ///   allocation.
    /// - `Store` when the store fails outside the conflict protocol.
    pub fn allocate(
        &self,
        scope: &ScopeKey,
        count_width: usize,
    ) -> Result<u64, SerialNumberError> {
        let capacity = count_capacity(count_width);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let current = self
                .store
                .load(scope)
                .map_err(|err| SerialNumberError::Store(err.to_string()))?;
            let next = current + 1;

            if next > capacity {
                tracing::warn!(scope = %scope, capacity, "count field exhausted for scope");
                return Err(SerialNumberError::CounterOverflow {
                    scope: scope.clone(),
                    width: count_width,
                });
            }

            match self.store.commit(scope, current, next) {
                Ok(()) => {
                    tracing::debug!(scope = %scope, count = next, "allocated serial count");
                    return Ok(next);
                }
                Err(CounterStoreError::Conflict) if attempts < self.retry_budget => {
                    tracing::debug!(scope = %scope, attempts, "counter commit conflict, retrying");
                }
                Err(CounterStoreError::Conflict) => {
                    tracing::warn!(scope = %scope, attempts, "counter commit conflict, budget exhausted");
                    return Err(SerialNumberError::AllocationConflict {
                        scope: scope.clone(),
                        attempts,
                    });
                }
                Err(err @ CounterStoreError::Unavailable(_)) => {
                    return Err(SerialNumberError::Store(err.to_string()));
                }
            }
        }
    }
}

/// In-memory counter store backed by a concurrent map.
///
/// Reference implementation for tests and single-process hosts. Entries
/// lock per map shard, so counters for different scopes do not contend on
/// one global lock.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: DashMap<ScopeKey, u64>,
}

impl InMemoryCounterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn load(&self, scope: &ScopeKey) -> Result<u64, CounterStoreError> {
        Ok(self.counters.get(scope).map_or(0, |entry| *entry))
    }

    fn commit(&self, scope: &ScopeKey, current: u64, next: u64) -> Result<(), CounterStoreError> {
        let mut entry = self.counters.entry(scope.clone()).or_insert(0);
        if *entry == current {
            *entry = next;
            Ok(())
        } else {
            Err(CounterStoreError::Conflict)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scope(raw: &str) -> ScopeKey {
        ScopeKey::from_raw(raw)
    }

    #[test]
    fn test_allocate_starts_at_one_and_is_gap_free() {
        let store = Arc::new(InMemoryCounterStore::new());
        let allocator = SequenceAllocator::new(store);
        let scope = scope("IN\u{1f}24");

        for expected in 1..=50u64 {
            assert_eq!(allocator.allocate(&scope, 4).unwrap(), expected);
        }
    }

    #[test]
    fn test_allocate_scopes_are_independent() {
        let store = Arc::new(InMemoryCounterStore::new());
        let allocator = SequenceAllocator::new(store);

        assert_eq!(allocator.allocate(&scope("IN\u{1f}24"), 4).unwrap(), 1);
        assert_eq!(allocator.allocate(&scope("IN\u{1f}25"), 4).unwrap(), 1);
        assert_eq!(allocator.allocate(&scope("IN\u{1f}24"), 4).unwrap(), 2);
    }

    #[test]
    fn test_overflow_on_exhausted_count_field() {
        let store = Arc::new(InMemoryCounterStore::new());
        let allocator = SequenceAllocator::new(Arc::clone(&store));
        let scope = scope("IN\u{1f}24");

        // A two-digit count field holds 1..=99.
        for expected in 1..=99u64 {
            assert_eq!(allocator.allocate(&scope, 2).unwrap(), expected);
        }
        let err = allocator.allocate(&scope, 2).unwrap_err();
        assert!(matches!(
            err,
            SerialNumberError::CounterOverflow { width: 2, .. }
        ));

        // The failed allocation must not advance the counter.
        assert_eq!(store.load(&scope).unwrap(), 99);
    }

    #[test]
    fn test_concurrent_allocations_are_unique() {
        let store = Arc::new(InMemoryCounterStore::new());
        let allocator = Arc::new(SequenceAllocator::new(store));
        let scope = scope("IN\u{1f}24");
        let threads = 8;
        let per_thread = 25;

        let mut handles = Vec::new();
        for _ in 0..threads {
            let allocator = Arc::clone(&allocator);
            let scope = scope.clone();
            handles.push(std::thread::spawn(move || {
                let mut counts = Vec::with_capacity(per_thread);
                for _ in 0..per_thread {
                    // A conflicted allocation may be retried by the caller.
                    loop {
                        match allocator.allocate(&scope, 6) {
                            Ok(count) => {
                                counts.push(count);
                                break;
                            }
                            Err(SerialNumberError::AllocationConflict { .. }) => {}
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                }
                counts
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        all.sort_unstable();

        let expected: Vec<u64> = (1..=(threads * per_thread) as u64).collect();
        assert_eq!(all, expected);
    }

    struct ConflictingStore {
        conflicts: AtomicU32,
    }

    impl CounterStore for ConflictingStore {
        fn load(&self, _scope: &ScopeKey) -> Result<u64, CounterStoreError> {
            Ok(0)
        }

        fn commit(
            &self,
            _scope: &ScopeKey,
            _current: u64,
            _next: u64,
        ) -> Result<(), CounterStoreError> {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
            Err(CounterStoreError::Conflict)
        }
    }

    #[test]
    fn test_conflict_budget_exhaustion() {
        let store = Arc::new(ConflictingStore {
            conflicts: AtomicU32::new(0),
        });
        let allocator = SequenceAllocator::new(Arc::clone(&store)).with_retry_budget(3);

        let err = allocator.allocate(&scope("IN"), 4).unwrap_err();
        assert!(matches!(
            err,
            SerialNumberError::AllocationConflict { attempts: 3, .. }
        ));
        assert!(err.is_retryable());
        assert_eq!(store.conflicts.load(Ordering::SeqCst), 3);
    }

    struct UnavailableStore;

    impl CounterStore for UnavailableStore {
        fn load(&self, _scope: &ScopeKey) -> Result<u64, CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".into()))
        }

        fn commit(
            &self,
            _scope: &ScopeKey,
            _current: u64,
            _next: u64,
        ) -> Result<(), CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_store_failure_surfaces() {
        let allocator = SequenceAllocator::new(Arc::new(UnavailableStore));
        let err = allocator.allocate(&scope("IN"), 4).unwrap_err();
        assert!(matches!(err, SerialNumberError::Store(_)));
        assert!(!err.is_retryable());
    }
}
