//! store::traits
//!
//! The `ScoreStore` trait: the command surface the locking core needs
//! from a shared ordered store.
//!
//! # Architecture
//!
//! Every backend exposes one ordered set per key, holding string members
//! with `f64` scores. The locking core only ever talks to this trait; no
//! other module issues store commands directly. The one non-negotiable
//! contract is that [`ScoreStore::add_if_absent`] is atomic across its
//! whole batch: when two callers race to add the same member, exactly one
//! of them observes it as newly added.

use thiserror::Error;

/// Errors from store operations.
///
/// Store failures propagate unchanged to the caller. The core performs
/// no retry, no backoff, and no circuit breaking.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A command against the Redis backend failed.
    #[error("store command failed: {0}")]
    Command(#[from] redis::RedisError),

    /// A backend-specific failure outside the command path.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Scoped access to an ordered store of `(member, score)` sets.
///
/// Implementations must be safe to share across threads; callers hold a
/// `ScoreStore` behind an `Arc` and invoke it concurrently with no
/// client-side locking.
///
/// Scores are absolute Unix timestamps in fractional seconds, but the
/// trait itself is agnostic: it only promises ordered-set semantics.
pub trait ScoreStore: Send + Sync {
    /// Add every `(score, member)` pair that is not already present, in
    /// one atomic batch. Members already in the set keep their existing
    /// score. Returns the number of members newly added.
    fn add_if_absent(&self, key: &str, entries: &[(f64, &str)]) -> Result<u64, StoreError>;

    /// Remove the given members unconditionally. Returns the number that
    /// actually existed.
    fn remove(&self, key: &str, members: &[&str]) -> Result<u64, StoreError>;

    /// Read one member's score, or `None` if the member is absent.
    fn score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError>;

    /// Read many members' scores in input order. Absent members report
    /// `None`, never zero.
    fn scores(&self, key: &str, members: &[&str]) -> Result<Vec<Option<f64>>, StoreError>;

    /// Remove every member whose score is strictly less than `cutoff`.
    /// Returns the number removed.
    fn remove_below(&self, key: &str, cutoff: f64) -> Result<u64, StoreError>;

    /// Count members with `min <= score <= max` (inclusive bounds;
    /// infinities allowed).
    fn count_in_range(&self, key: &str, min: f64, max: f64) -> Result<u64, StoreError>;

    /// Read members with `min <= score <= max` in ascending score order
    /// (ties broken lexicographically).
    fn members_in_range(&self, key: &str, min: f64, max: f64) -> Result<Vec<String>, StoreError>;

    /// Total number of members under `key`.
    fn cardinality(&self, key: &str) -> Result<u64, StoreError>;

    /// Delete the whole set. Returns whether anything existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// List every key starting with `prefix`.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
