//! locker
//!
//! Convenience facade over the core types.
//!
//! # Responsibilities
//!
//! - Turn a flat segment list into a namespaced [`Lock`] or [`Dataset`]
//! - Apply configured defaults (namespace, TTL, store URL)
//! - List every key under the configured namespace
//!
//! The facade is thin composition glue: all locking semantics live in
//! [`Dataset`] and [`Lock`]. Usage validation happens before any store
//! round trip.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Error;
use crate::key::KeyBuilder;
use crate::lock::Lock;
use crate::store::{self, ScoreStore};

/// Entry point tying configuration, key building, and the store together.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cordon::{Config, Locker, MemoryStore};
///
/// let locker = Locker::with_store(Arc::new(MemoryStore::new()), Config::default());
///
/// // Last segment is the lock id; the rest form the namespace path.
/// let ran = locker.with_lock(&["app", "reports", "nightly"], || "done").unwrap();
/// assert_eq!(ran, Some("done"));
/// ```
pub struct Locker {
    store: Arc<dyn ScoreStore>,
    keys: KeyBuilder,
    config: Config,
}

impl Locker {
    /// Connect to the configured Redis URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on invalid configuration and
    /// [`Error::Store`] on an unparseable URL.
    pub fn connect(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let store = store::connect(&config.url)?;
        Ok(Self::with_store(store, config))
    }

    /// Build a locker over an explicit store handle.
    ///
    /// Lets embedded or test callers supply a [`crate::MemoryStore`] (or
    /// any other backend) instead of connecting to Redis.
    pub fn with_store(store: Arc<dyn ScoreStore>, config: Config) -> Self {
        let keys = KeyBuilder::new(&config.namespace);
        Self {
            store,
            keys,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The key builder for the configured namespace.
    pub fn key_builder(&self) -> &KeyBuilder {
        &self.keys
    }

    /// Build a [`Lock`] from a flat path: the last segment is the lock
    /// id, the preceding segments form the key namespace.
    ///
    /// Uses the configured default TTL; see [`Locker::lock_with_ttl`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for fewer than two segments.
    pub fn lock<S: AsRef<str>>(&self, path: &[S]) -> Result<Lock, Error> {
        self.lock_with_ttl(path, self.config.default_ttl())
    }

    /// Like [`Locker::lock`] with an explicit TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for fewer than two segments.
    pub fn lock_with_ttl<S: AsRef<str>>(&self, path: &[S], ttl: Duration) -> Result<Lock, Error> {
        let Some((id, segments)) = path.split_last() else {
            return Err(Error::Usage(
                "need at least a namespace segment and a lock id".into(),
            ));
        };
        if segments.is_empty() {
            return Err(Error::Usage(
                "need at least a namespace segment and a lock id".into(),
            ));
        }
        let lock_key = self.keys.build(segments);
        Ok(Lock::new(self.store.clone(), lock_key, id.as_ref(), ttl))
    }

    /// Build a [`Dataset`] for a namespace path with the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for an empty path.
    pub fn dataset<S: AsRef<str>>(&self, segments: &[S]) -> Result<Dataset, Error> {
        self.dataset_with_ttl(segments, self.config.default_ttl())
    }

    /// Like [`Locker::dataset`] with an explicit TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for an empty path.
    pub fn dataset_with_ttl<S: AsRef<str>>(
        &self,
        segments: &[S],
        ttl: Duration,
    ) -> Result<Dataset, Error> {
        if segments.is_empty() {
            return Err(Error::Usage("need at least one namespace segment".into()));
        }
        let lock_key = self.keys.build(segments);
        Ok(Dataset::new(self.store.clone(), lock_key, ttl))
    }

    /// Facade straight to the scoped call: build the lock and run `f`
    /// under it. See [`Lock::with_lock`] for the contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for fewer than two segments, and any
    /// store failure unchanged.
    pub fn with_lock<S: AsRef<str>, T>(
        &self,
        path: &[S],
        f: impl FnOnce() -> T,
    ) -> Result<Option<T>, Error> {
        Ok(self.lock(path)?.with_lock(f)?)
    }

    /// List every key under the configured namespace.
    ///
    /// A debugging/operations utility, not part of the locking hot path.
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged.
    pub fn keys(&self) -> Result<Vec<String>, Error> {
        Ok(self.store.keys_with_prefix(&self.keys.prefix())?)
    }
}
