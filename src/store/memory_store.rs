//! store::memory_store
//!
//! In-process [`ScoreStore`] backend.
//!
//! Backs hermetic tests and embedded single-process use. Semantics mirror
//! the Redis backend: members are unique per key, range reads come back
//! in score order with lexicographic tie-breaks, and a set that loses its
//! last member disappears entirely.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::traits::{ScoreStore, StoreError};

/// A [`ScoreStore`] held entirely in process memory.
///
/// The interior mutex makes every batch operation atomic, which is all
/// the locking core requires of a backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: Mutex<HashMap<String, HashMap<String, f64>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sets(&self) -> MutexGuard<'_, HashMap<String, HashMap<String, f64>>> {
        // A poisoned mutex only means another thread panicked mid-write;
        // the map itself is still structurally sound.
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScoreStore for MemoryStore {
    fn add_if_absent(&self, key: &str, entries: &[(f64, &str)]) -> Result<u64, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }
        let mut sets = self.sets();
        let set = sets.entry(key.to_string()).or_default();
        let mut added = 0;
        for (score, member) in entries {
            if !set.contains_key(*member) {
                set.insert((*member).to_string(), *score);
                added += 1;
            }
        }
        Ok(added)
    }

    fn remove(&self, key: &str, members: &[&str]) -> Result<u64, StoreError> {
        let mut sets = self.sets();
        let Some(set) = sets.get_mut(key) else {
            return Ok(0);
        };
        let mut removed = 0;
        for member in members {
            if set.remove(*member).is_some() {
                removed += 1;
            }
        }
        if set.is_empty() {
            sets.remove(key);
        }
        Ok(removed)
    }

    fn score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        Ok(self.sets().get(key).and_then(|set| set.get(member).copied()))
    }

    fn scores(&self, key: &str, members: &[&str]) -> Result<Vec<Option<f64>>, StoreError> {
        let sets = self.sets();
        let set = sets.get(key);
        Ok(members
            .iter()
            .map(|m| set.and_then(|s| s.get(*m).copied()))
            .collect())
    }

    fn remove_below(&self, key: &str, cutoff: f64) -> Result<u64, StoreError> {
        let mut sets = self.sets();
        let Some(set) = sets.get_mut(key) else {
            return Ok(0);
        };
        let before = set.len();
        set.retain(|_, score| *score >= cutoff);
        let removed = (before - set.len()) as u64;
        if set.is_empty() {
            sets.remove(key);
        }
        Ok(removed)
    }

    fn count_in_range(&self, key: &str, min: f64, max: f64) -> Result<u64, StoreError> {
        let sets = self.sets();
        let Some(set) = sets.get(key) else {
            return Ok(0);
        };
        Ok(set.values().filter(|s| **s >= min && **s <= max).count() as u64)
    }

    fn members_in_range(&self, key: &str, min: f64, max: f64) -> Result<Vec<String>, StoreError> {
        let sets = self.sets();
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };
        let mut hits: Vec<(&String, f64)> = set
            .iter()
            .filter(|(_, s)| **s >= min && **s <= max)
            .map(|(m, s)| (m, *s))
            .collect();
        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        Ok(hits.into_iter().map(|(m, _)| m.clone()).collect())
    }

    fn cardinality(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self.sets().get(key).map_or(0, |set| set.len() as u64))
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.sets().remove(key).is_some())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .sets()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_if_absent_skips_existing_members() {
        let store = MemoryStore::new();
        assert_eq!(store.add_if_absent("k", &[(1.0, "a")]).unwrap(), 1);
        assert_eq!(
            store.add_if_absent("k", &[(9.0, "a"), (2.0, "b")]).unwrap(),
            1
        );
        // The existing member keeps its original score.
        assert_eq!(store.score("k", "a").unwrap(), Some(1.0));
        assert_eq!(store.score("k", "b").unwrap(), Some(2.0));
    }

    #[test]
    fn scores_reports_missing_as_none() {
        let store = MemoryStore::new();
        store.add_if_absent("k", &[(1.5, "a")]).unwrap();
        assert_eq!(
            store.scores("k", &["a", "missing"]).unwrap(),
            vec![Some(1.5), None]
        );
        assert_eq!(store.scores("absent-key", &["a"]).unwrap(), vec![None]);
    }

    #[test]
    fn remove_below_is_strict() {
        let store = MemoryStore::new();
        store
            .add_if_absent("k", &[(1.0, "old"), (2.0, "edge"), (3.0, "new")])
            .unwrap();
        assert_eq!(store.remove_below("k", 2.0).unwrap(), 1);
        assert_eq!(store.score("k", "edge").unwrap(), Some(2.0));
        assert_eq!(store.score("k", "old").unwrap(), None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let store = MemoryStore::new();
        store
            .add_if_absent("k", &[(1.0, "a"), (2.0, "b"), (3.0, "c")])
            .unwrap();
        assert_eq!(store.count_in_range("k", 1.0, 2.0).unwrap(), 2);
        assert_eq!(
            store.members_in_range("k", 2.0, f64::INFINITY).unwrap(),
            vec!["b", "c"]
        );
    }

    #[test]
    fn members_in_range_breaks_score_ties_lexicographically() {
        let store = MemoryStore::new();
        store
            .add_if_absent("k", &[(1.0, "zeta"), (1.0, "alpha")])
            .unwrap();
        assert_eq!(
            store
                .members_in_range("k", f64::NEG_INFINITY, f64::INFINITY)
                .unwrap(),
            vec!["alpha", "zeta"]
        );
    }

    #[test]
    fn empty_set_vanishes() {
        let store = MemoryStore::new();
        store.add_if_absent("k", &[(1.0, "a")]).unwrap();
        assert_eq!(store.remove("k", &["a"]).unwrap(), 1);
        assert!(!store.delete("k").unwrap());
        assert_eq!(store.cardinality("k").unwrap(), 0);
    }

    #[test]
    fn delete_reports_existence() {
        let store = MemoryStore::new();
        assert!(!store.delete("k").unwrap());
        store.add_if_absent("k", &[(1.0, "a")]).unwrap();
        assert!(store.delete("k").unwrap());
    }

    #[test]
    fn keys_with_prefix_filters() {
        let store = MemoryStore::new();
        store.add_if_absent("app:a", &[(1.0, "x")]).unwrap();
        store.add_if_absent("app:b", &[(1.0, "x")]).unwrap();
        store.add_if_absent("other:c", &[(1.0, "x")]).unwrap();
        assert_eq!(
            store.keys_with_prefix("app:").unwrap(),
            vec!["app:a", "app:b"]
        );
    }
}
