//! dataset
//!
//! A set of lock entries sharing one store key.
//!
//! # Architecture
//!
//! A [`Dataset`] owns one sorted-set key (the `lock_key`) and manages any
//! number of member ids inside it, each with its own absolute expiry
//! score. The dataset itself is stateless beyond its three identifying
//! fields; it is safe (and cheap) to reconstruct repeatedly pointing at
//! the same store-side state, from any number of processes.
//!
//! # Invariants
//!
//! - An entry is *active* iff `expires_at >= now`; it is *expired* iff
//!   `expires_at < now`. Cleanup removes exactly the expired entries, so
//!   the two boundaries partition the set.
//! - Expired entries may linger physically until a cleanup pass runs, but
//!   no read on this type ever reports an expired entry as locked.
//! - `ttl` only affects entries acquired through this instance. Entries
//!   already in the set keep the expiry they were given at their own
//!   acquisition, so different TTLs coexist under one `lock_key`.
//! - The only cross-caller synchronization is the atomic conditional add
//!   in [`Dataset::acquire`]; no client-side mutex exists or is needed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::clock;
use crate::store::{ScoreStore, StoreError};

/// A named set of lock entries with per-entry expiry.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use cordon::{Dataset, MemoryStore};
///
/// let store = Arc::new(MemoryStore::new());
/// let jobs = Dataset::new(store, "cordon:app:jobs", Duration::from_secs(60));
///
/// assert!(jobs.acquire(&["job-1", "job-2"]).unwrap());
/// assert!(jobs.is_locked(&["job-1"]).unwrap());
/// assert!(jobs.release(&["job-1"]).unwrap());
/// ```
#[derive(Clone)]
pub struct Dataset {
    store: Arc<dyn ScoreStore>,
    lock_key: String,
    ttl: Duration,
}

impl Dataset {
    /// Create a dataset over `lock_key` whose newly acquired entries
    /// expire `ttl` after acquisition.
    pub fn new(store: Arc<dyn ScoreStore>, lock_key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            lock_key: lock_key.into(),
            ttl,
        }
    }

    /// The store key this dataset manages.
    pub fn lock_key(&self) -> &str {
        &self.lock_key
    }

    /// The TTL applied to entries acquired through this instance.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The shared store handle.
    pub(crate) fn store(&self) -> &Arc<dyn ScoreStore> {
        &self.store
    }

    /// Try to acquire the given ids, expiring `ttl` from now.
    ///
    /// Runs a cleanup pass first so ids whose previous hold has lapsed
    /// can be re-acquired, then conditionally adds every id in one atomic
    /// request. Ids still actively held are left untouched and keep their
    /// original expiry.
    ///
    /// **Returns `true` if at least one id was newly acquired** — not
    /// "all requested ids". A call that acquires 1 of 3 ids still returns
    /// `true`. Callers that need all-or-nothing must check
    /// [`Dataset::locked_members`] beforehand, or release on partial
    /// acquisition themselves.
    ///
    /// An empty id list is a no-op returning `false`, with no store
    /// round trip.
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn acquire<S: AsRef<str>>(&self, ids: &[S]) -> Result<bool, StoreError> {
        self.acquire_at(ids, clock::now())
    }

    fn acquire_at<S: AsRef<str>>(&self, ids: &[S], now: f64) -> Result<bool, StoreError> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        if ids.is_empty() {
            return Ok(false);
        }
        self.flush_expired_members_at(now)?;
        let expires_at = now + self.ttl.as_secs_f64();
        let entries: Vec<(f64, &str)> = ids.iter().map(|id| (expires_at, *id)).collect();
        let added = self.store.add_if_absent(&self.lock_key, &entries)?;
        debug!(
            key = %self.lock_key,
            requested = ids.len(),
            added,
            "acquire"
        );
        Ok(added > 0)
    }

    /// Remove the given ids unconditionally.
    ///
    /// Returns `true` iff at least one id actually existed. Releasing an
    /// id that is not present is not an error; it simply contributes
    /// nothing to the count. An empty id list returns `false` with no
    /// store round trip.
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn release<S: AsRef<str>>(&self, ids: &[S]) -> Result<bool, StoreError> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        if ids.is_empty() {
            return Ok(false);
        }
        let removed = self.store.remove(&self.lock_key, &ids)?;
        debug!(key = %self.lock_key, requested = ids.len(), removed, "release");
        Ok(removed > 0)
    }

    /// Whether any of the given ids is actively held.
    ///
    /// Missing ids are treated as absent; expired ids never count, even
    /// if cleanup has not yet removed them. Empty input returns `false`.
    pub fn is_locked<S: AsRef<str>>(&self, ids: &[S]) -> Result<bool, StoreError> {
        self.is_locked_at(ids, clock::now())
    }

    fn is_locked_at<S: AsRef<str>>(&self, ids: &[S], now: f64) -> Result<bool, StoreError> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        if ids.is_empty() {
            return Ok(false);
        }
        let scores = self.store.scores(&self.lock_key, &ids)?;
        Ok(scores.iter().any(|score| is_active(*score, now)))
    }

    /// The subset of `ids` that is actively held, in input order.
    pub fn locked_members<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<String>, StoreError> {
        self.locked_members_at(ids, clock::now())
    }

    fn locked_members_at<S: AsRef<str>>(
        &self,
        ids: &[S],
        now: f64,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .partition_at(ids, now)?
            .into_iter()
            .filter_map(|(id, active)| active.then_some(id))
            .collect())
    }

    /// The subset of `ids` that is *not* actively held (no entry, or an
    /// expired one), in input order. The exact complement of
    /// [`Dataset::locked_members`].
    pub fn unlocked_members<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<String>, StoreError> {
        self.unlocked_members_at(ids, clock::now())
    }

    fn unlocked_members_at<S: AsRef<str>>(
        &self,
        ids: &[S],
        now: f64,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .partition_at(ids, now)?
            .into_iter()
            .filter_map(|(id, active)| (!active).then_some(id))
            .collect())
    }

    /// One scores read, classifying every id as active or not.
    fn partition_at<S: AsRef<str>>(
        &self,
        ids: &[S],
        now: f64,
    ) -> Result<Vec<(String, bool)>, StoreError> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let scores = self.store.scores(&self.lock_key, &ids)?;
        Ok(ids
            .iter()
            .zip(scores)
            .map(|(id, score)| ((*id).to_string(), is_active(score, now)))
            .collect())
    }

    /// Delete the entire set.
    ///
    /// Returns whether anything was deleted.
    pub fn flush(&self) -> Result<bool, StoreError> {
        let deleted = self.store.delete(&self.lock_key)?;
        debug!(key = %self.lock_key, deleted, "flush");
        Ok(deleted)
    }

    /// Remove every entry whose expiry is strictly in the past.
    ///
    /// An entry whose expiry equals the current instant survives: it is
    /// still active under the inclusive boundary used by the read side.
    /// Returns whether anything was removed.
    pub fn flush_expired_members(&self) -> Result<bool, StoreError> {
        self.flush_expired_members_at(clock::now())
    }

    fn flush_expired_members_at(&self, now: f64) -> Result<bool, StoreError> {
        let removed = self.store.remove_below(&self.lock_key, now)?;
        if removed > 0 {
            debug!(key = %self.lock_key, removed, "flushed expired members");
        }
        Ok(removed > 0)
    }

    /// Number of active entries.
    ///
    /// Runs a cleanup pass first so the count reflects only entries that
    /// are still live. See [`Dataset::raw_size`] for the opt-out.
    pub fn size(&self) -> Result<u64, StoreError> {
        self.size_at(clock::now())
    }

    fn size_at(&self, now: f64) -> Result<u64, StoreError> {
        self.flush_expired_members_at(now)?;
        self.store
            .count_in_range(&self.lock_key, now, f64::INFINITY)
    }

    /// Raw cardinality without a cleanup pass.
    ///
    /// May include entries that have expired but not yet been cleaned up.
    pub fn raw_size(&self) -> Result<u64, StoreError> {
        self.store.cardinality(&self.lock_key)
    }

    /// Iterate over the active ids in the set.
    ///
    /// Runs a cleanup pass, then snapshots the live membership at that
    /// instant. The iterator is finite; calling `members()` again
    /// re-queries the store rather than replaying the old snapshot.
    pub fn members(&self) -> Result<Members, StoreError> {
        self.members_at(clock::now())
    }

    fn members_at(&self, now: f64) -> Result<Members, StoreError> {
        self.flush_expired_members_at(now)?;
        let ids = self
            .store
            .members_in_range(&self.lock_key, now, f64::INFINITY)?;
        Ok(Members {
            inner: ids.into_iter(),
        })
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("lock_key", &self.lock_key)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Datasets compare by their identifying fields; the store handle is
/// deliberately excluded.
impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.lock_key == other.lock_key && self.ttl == other.ttl
    }
}

impl Eq for Dataset {}

/// Active-entry predicate: present and not yet past its expiry.
///
/// The boundary is inclusive — a score exactly equal to `now` is still
/// active. Cleanup uses the strict complement (`score < now`), so every
/// entry is on exactly one side.
fn is_active(score: Option<f64>, now: f64) -> bool {
    match score {
        Some(expires_at) => expires_at >= now,
        None => false,
    }
}

/// Snapshot iterator over a dataset's active ids.
///
/// Produced by [`Dataset::members`]; see there for restart semantics.
#[derive(Debug)]
pub struct Members {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for Members {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Members {}
