//! lock
//!
//! A single named lock and its critical-section contract.
//!
//! # Architecture
//!
//! [`Lock`] is a one-id specialization of [`Dataset`]: every operation
//! delegates to the dataset so the expiry boundary rules stay in exactly
//! one place. On top of that it adds the scoped-execution contract —
//! [`Lock::with_lock`] guarantees release on every exit path, including a
//! panicking closure — and an RAII [`LockGuard`] for callers that prefer
//! holding the lock across a scope.
//!
//! # Invariants
//!
//! - Exclusivity rests solely on the atomic conditional add inside
//!   [`Dataset::acquire`]; the fail-fast check at the top of `with_lock`
//!   is an optimization, not a correctness requirement.
//! - A holder that outlives its TTL loses exclusivity silently; there is
//!   no warning and no callback.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::dataset::Dataset;
use crate::store::{ScoreStore, StoreError};

/// A named distributed lock with time-based expiry.
///
/// Two `Lock` values with the same `(lock_key, id, ttl)` are equal and
/// interchangeable: they address the same store-side state, whichever
/// process constructed them.
///
/// `lock`/`unlock` are aliases of `acquire`/`release`; both names are
/// part of the public contract.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use cordon::{Lock, MemoryStore};
///
/// let store = Arc::new(MemoryStore::new());
/// let lock = Lock::new(store, "cordon:app:reports", "nightly", Duration::from_secs(60));
///
/// let ran = lock.with_lock(|| "generated").unwrap();
/// assert_eq!(ran, Some("generated"));
/// assert!(!lock.is_locked().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    dataset: Dataset,
    id: String,
}

impl Lock {
    /// Create a lock for `id` under `lock_key`.
    pub fn new(
        store: Arc<dyn ScoreStore>,
        lock_key: impl Into<String>,
        id: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            dataset: Dataset::new(store, lock_key, ttl),
            id: id.into(),
        }
    }

    /// The store key grouping this lock with its siblings.
    pub fn lock_key(&self) -> &str {
        self.dataset.lock_key()
    }

    /// The id this lock guards.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The TTL applied at acquisition.
    pub fn ttl(&self) -> Duration {
        self.dataset.ttl()
    }

    /// The dataset this lock lives in.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Try to acquire the lock, expiring `ttl` from now.
    ///
    /// Returns `false` if the id is already actively held (by anyone,
    /// this process included).
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn acquire(&self) -> Result<bool, StoreError> {
        self.dataset.acquire(&[self.id.as_str()])
    }

    /// Alias for [`Lock::acquire`].
    pub fn lock(&self) -> Result<bool, StoreError> {
        self.acquire()
    }

    /// Release the lock.
    ///
    /// Returns `true` iff the id was actually held. Releasing a lock that
    /// is not held is not an error.
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn release(&self) -> Result<bool, StoreError> {
        self.dataset.release(&[self.id.as_str()])
    }

    /// Alias for [`Lock::release`].
    pub fn unlock(&self) -> Result<bool, StoreError> {
        self.release()
    }

    /// Whether the id is actively held right now.
    ///
    /// Uses the same inclusive expiry boundary as every other read: an
    /// entry expiring at exactly this instant is still locked.
    pub fn is_locked(&self) -> Result<bool, StoreError> {
        self.dataset.is_locked(&[self.id.as_str()])
    }

    /// Run `f` while holding the lock, releasing on every exit path.
    ///
    /// Returns `Ok(None)` without running `f` when the lock is
    /// unavailable — that is the normal "someone else has it" outcome,
    /// not a failure. Otherwise returns `Ok(Some(value))` with whatever
    /// `f` produced.
    ///
    /// If `f` panics, the lock is released first and the panic then
    /// continues unwinding to the caller.
    ///
    /// The initial `is_locked` check only avoids a pointless write
    /// attempt; losing a race between it and the acquire is expected and
    /// handled by the acquire's own conditional add.
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged, including a failure to
    /// release after `f` has completed.
    pub fn with_lock<T>(&self, f: impl FnOnce() -> T) -> Result<Option<T>, StoreError> {
        if self.is_locked()? {
            trace!(key = %self.lock_key(), id = %self.id, "lock busy, skipping");
            return Ok(None);
        }
        if !self.acquire()? {
            trace!(key = %self.lock_key(), id = %self.id, "lost acquire race");
            return Ok(None);
        }

        // Released on unwind if f panics; disarmed on the normal path so
        // release happens exactly once, with its error observable.
        let mut pending = ReleaseOnDrop {
            lock: self,
            armed: true,
        };
        let value = f();
        pending.armed = false;
        drop(pending);

        self.release()?;
        Ok(Some(value))
    }

    /// Acquire and hand back an RAII guard, or `None` if unavailable.
    ///
    /// The guard releases the lock when dropped (best effort — a release
    /// failure on drop is discarded). Call [`LockGuard::release`] to
    /// release early and observe the result.
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn guard(&self) -> Result<Option<LockGuard>, StoreError> {
        if self.acquire()? {
            Ok(Some(LockGuard {
                lock: self.clone(),
                held: true,
            }))
        } else {
            Ok(None)
        }
    }
}

struct ReleaseOnDrop<'a> {
    lock: &'a Lock,
    armed: bool,
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.lock.release();
        }
    }
}

/// RAII handle to an acquired [`Lock`].
///
/// Obtained from [`Lock::guard`]. Dropping the guard releases the lock.
#[derive(Debug)]
pub struct LockGuard {
    lock: Lock,
    held: bool,
}

impl LockGuard {
    /// The lock this guard holds.
    pub fn lock(&self) -> &Lock {
        &self.lock
    }

    /// Whether this guard still holds the lock.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Release the lock now instead of at drop.
    ///
    /// Returns whether the store still had the entry (a hold that
    /// outlived its TTL may already be gone).
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn release(mut self) -> Result<bool, StoreError> {
        self.held = false;
        self.lock.release()
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.held {
            let _ = self.lock.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    const TTL: Duration = Duration::from_secs(60);

    fn lock_pair() -> (Lock, Lock) {
        let store: Arc<dyn ScoreStore> = Arc::new(MemoryStore::new());
        let a = Lock::new(store.clone(), "cordon:test:reports", "nightly", TTL);
        let b = Lock::new(store, "cordon:test:reports", "nightly", TTL);
        (a, b)
    }

    #[test]
    fn acquire_then_release_roundtrip() {
        let (lock, _) = lock_pair();
        assert!(lock.acquire().unwrap());
        assert!(lock.is_locked().unwrap());
        assert!(lock.release().unwrap());
        assert!(!lock.is_locked().unwrap());
    }

    #[test]
    fn aliases_behave_like_their_canonical_names() {
        let (lock, _) = lock_pair();
        assert!(lock.lock().unwrap());
        assert!(!lock.lock().unwrap());
        assert!(lock.unlock().unwrap());
        assert!(!lock.unlock().unwrap());
    }

    #[test]
    fn second_instance_cannot_acquire_held_lock() {
        let (a, b) = lock_pair();
        assert!(a.acquire().unwrap());
        assert!(!b.acquire().unwrap());
        assert!(b.is_locked().unwrap());
    }

    #[test]
    fn with_lock_runs_block_and_releases() {
        let (lock, _) = lock_pair();
        let result = lock.with_lock(|| 41 + 1).unwrap();
        assert_eq!(result, Some(42));
        assert!(!lock.is_locked().unwrap());
    }

    #[test]
    fn with_lock_preserves_unit_and_default_values() {
        let (lock, _) = lock_pair();
        // A block returning () still counts as "ran": Some(()).
        assert_eq!(lock.with_lock(|| ()).unwrap(), Some(()));
        assert_eq!(lock.with_lock(|| false).unwrap(), Some(false));
    }

    #[test]
    fn with_lock_skips_block_when_already_held() {
        let (a, b) = lock_pair();
        assert!(a.acquire().unwrap());
        let mut ran = false;
        let result = b
            .with_lock(|| {
                ran = true;
            })
            .unwrap();
        assert_eq!(result, None);
        assert!(!ran);
        // The holder is unaffected by the failed attempt.
        assert!(a.is_locked().unwrap());
    }

    #[test]
    fn with_lock_is_not_reentrant() {
        let (a, b) = lock_pair();
        let outer = a
            .with_lock(|| b.with_lock(|| "inner").unwrap())
            .unwrap();
        // The inner attempt sees the lock held and yields None.
        assert_eq!(outer, Some(None));
        assert!(!a.is_locked().unwrap());
    }

    #[test]
    fn with_lock_releases_after_panic_and_panic_propagates() {
        let (lock, _) = lock_pair();
        let result = catch_unwind(AssertUnwindSafe(|| {
            lock.with_lock(|| panic!("boom")).unwrap();
        }));
        assert!(result.is_err());
        assert!(!lock.is_locked().unwrap());
        // The lock is usable again immediately.
        assert_eq!(lock.with_lock(|| "next").unwrap(), Some("next"));
    }

    #[test]
    fn with_lock_succeeds_after_holder_releases() {
        let (a, b) = lock_pair();
        assert!(a.acquire().unwrap());
        assert_eq!(b.with_lock(|| 1).unwrap(), None);
        a.release().unwrap();
        assert_eq!(b.with_lock(|| 1).unwrap(), Some(1));
    }

    #[test]
    fn guard_releases_on_drop() {
        let (lock, _) = lock_pair();
        {
            let guard = lock.guard().unwrap().expect("should acquire");
            assert!(guard.is_held());
            assert!(lock.is_locked().unwrap());
        }
        assert!(!lock.is_locked().unwrap());
    }

    #[test]
    fn guard_explicit_release() {
        let (lock, _) = lock_pair();
        let guard = lock.guard().unwrap().expect("should acquire");
        assert!(guard.release().unwrap());
        assert!(!lock.is_locked().unwrap());
    }

    #[test]
    fn guard_unavailable_when_held() {
        let (a, b) = lock_pair();
        let _guard = a.guard().unwrap().expect("should acquire");
        assert!(b.guard().unwrap().is_none());
    }

    #[test]
    fn locks_compare_by_value() {
        let store_a: Arc<dyn ScoreStore> = Arc::new(MemoryStore::new());
        let store_b: Arc<dyn ScoreStore> = Arc::new(MemoryStore::new());
        let a = Lock::new(store_a.clone(), "k", "id", TTL);
        let b = Lock::new(store_b, "k", "id", TTL);
        assert_eq!(a, b);

        let other_id = Lock::new(store_a.clone(), "k", "id2", TTL);
        let other_ttl = Lock::new(store_a, "k", "id", Duration::from_secs(61));
        assert_ne!(a, other_id);
        assert_ne!(a, other_ttl);
    }

    #[test]
    fn accessors_expose_identity() {
        let (lock, _) = lock_pair();
        assert_eq!(lock.lock_key(), "cordon:test:reports");
        assert_eq!(lock.id(), "nightly");
        assert_eq!(lock.ttl(), TTL);
        assert_eq!(lock.dataset().lock_key(), "cordon:test:reports");
    }
}
