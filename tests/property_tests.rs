//! Property-based tests for key construction and dataset semantics.
//!
//! These tests use proptest to verify invariants hold across randomly
//! generated inputs, with the in-memory backend standing in for the
//! store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use cordon::{Dataset, KeyBuilder, MemoryStore};

/// Strategy for raw key segments: printable, possibly padded and
/// mixed-case.
fn raw_segment() -> impl Strategy<Value = String> {
    "[ ]{0,2}[A-Za-z][A-Za-z0-9_-]{0,10}[ ]{0,2}"
}

/// Strategy for sets of distinct lock ids.
fn distinct_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z0-9]{1,12}", 1..8)
        .prop_map(|set| set.into_iter().collect())
}

fn dataset() -> Dataset {
    Dataset::new(
        Arc::new(MemoryStore::new()),
        "cordon:prop:jobs",
        Duration::from_secs(3600),
    )
}

proptest! {
    /// Built keys are fully normalized: no surrounding whitespace, no
    /// uppercase, always under the namespace prefix.
    #[test]
    fn built_keys_are_normalized(segments in prop::collection::vec(raw_segment(), 1..5)) {
        let keys = KeyBuilder::new("cordon");
        let key = keys.build(&segments);

        prop_assert!(key.starts_with("cordon:"));
        prop_assert_eq!(key.to_lowercase(), key.clone());
        for part in key.split(':') {
            prop_assert_eq!(part.trim(), part);
            prop_assert!(!part.is_empty());
        }
    }

    /// Building a key is idempotent: feeding the built components back
    /// in produces the same key.
    #[test]
    fn key_building_is_idempotent(segments in prop::collection::vec(raw_segment(), 1..5)) {
        let keys = KeyBuilder::new("cordon");
        let first = keys.build(&segments);

        let components: Vec<&str> = first.split(':').skip(1).collect();
        let second = keys.build(&components);
        prop_assert_eq!(first, second);
    }

    /// A fresh acquisition locks every requested id, in input order.
    #[test]
    fn fresh_acquire_locks_all_ids(ids in distinct_ids()) {
        let ds = dataset();
        prop_assert!(ds.acquire(&ids).unwrap());
        prop_assert_eq!(ds.locked_members(&ids).unwrap(), ids.clone());
        prop_assert!(ds.unlocked_members(&ids).unwrap().is_empty());
        prop_assert_eq!(ds.size().unwrap(), ids.len() as u64);
    }

    /// Acquiring the identical id set twice fails the second time: no
    /// id is newly added.
    #[test]
    fn repeat_acquire_fails(ids in distinct_ids()) {
        let ds = dataset();
        prop_assert!(ds.acquire(&ids).unwrap());
        prop_assert!(!ds.acquire(&ids).unwrap());
    }

    /// locked_members and unlocked_members partition the input exactly,
    /// preserving relative order.
    #[test]
    fn membership_is_an_exact_partition(ids in distinct_ids(), take in 0usize..8) {
        let ds = dataset();
        let held: Vec<String> = ids.iter().take(take.min(ids.len())).cloned().collect();
        if !held.is_empty() {
            ds.acquire(&held).unwrap();
        }

        let locked = ds.locked_members(&ids).unwrap();
        let unlocked = ds.unlocked_members(&ids).unwrap();

        prop_assert_eq!(locked.len() + unlocked.len(), ids.len());
        let held_set: HashSet<&String> = held.iter().collect();
        for id in &locked {
            prop_assert!(held_set.contains(id));
        }
        for id in &unlocked {
            prop_assert!(!held_set.contains(id));
        }

        // Interleaving the two partitions by input order reconstructs
        // the input.
        let mut merged = Vec::new();
        let (mut li, mut ui) = (0, 0);
        for id in &ids {
            if li < locked.len() && &locked[li] == id {
                merged.push(locked[li].clone());
                li += 1;
            } else {
                prop_assert!(ui < unlocked.len() && &unlocked[ui] == id);
                merged.push(unlocked[ui].clone());
                ui += 1;
            }
        }
        prop_assert_eq!(merged, ids);
    }

    /// Releasing everything acquired empties the set.
    #[test]
    fn release_undoes_acquire(ids in distinct_ids()) {
        let ds = dataset();
        ds.acquire(&ids).unwrap();
        prop_assert!(ds.release(&ids).unwrap());
        prop_assert_eq!(ds.size().unwrap(), 0);
        prop_assert!(!ds.is_locked(&ids).unwrap());
        // A second release has nothing left to remove.
        prop_assert!(!ds.release(&ids).unwrap());
    }
}
