//! cordon - Distributed work locks over Redis sorted sets
//!
//! cordon lets independent processes agree, through a shared Redis
//! instance, that at most one of them is doing a given named unit of work
//! at a time. Exclusivity expires on a TTL instead of relying on explicit
//! unlocks, so a crashed holder never wedges the system.
//!
//! # Architecture
//!
//! - [`locker`] - Convenience facade: flat paths, configured defaults
//! - [`lock`] - A single named lock and the scoped-execution contract
//! - [`dataset`] - A set of lock entries sharing one store key
//! - [`key`] - Deterministic key construction
//! - [`store`] - The ordered-store seam (Redis and in-memory backends)
//! - [`config`] - Store URL, namespace, and TTL defaults
//! - [`cli`] - Companion command-line tool
//!
//! Data flows one direction: locker → key + lock → dataset → store. No
//! layer calls back upward.
//!
//! # Correctness Invariants
//!
//! 1. An entry is locked iff its expiry score is at or after now;
//!    cleanup removes exactly the strictly-past entries
//! 2. Acquisition is a single atomic conditional add — the store
//!    resolves races, so no client-side synchronization exists
//! 3. Scoped execution releases on every exit path, panics included
//! 4. A holder that outlives its TTL loses exclusivity silently
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cordon::{Config, Locker, MemoryStore};
//!
//! // Swap MemoryStore for Locker::connect(config) in production.
//! let locker = Locker::with_store(Arc::new(MemoryStore::new()), Config::default());
//!
//! let report = locker.with_lock(&["app", "reports", "nightly"], || {
//!     // ... at most one process runs this at a time ...
//!     "report contents"
//! }).unwrap();
//! assert_eq!(report, Some("report contents"));
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod key;
pub mod lock;
pub mod locker;
pub mod store;

mod clock;

pub use config::{Config, ConfigError};
pub use dataset::{Dataset, Members};
pub use error::Error;
pub use key::KeyBuilder;
pub use lock::{Lock, LockGuard};
pub use locker::Locker;
pub use store::{MemoryStore, RedisStore, ScoreStore, StoreError};
