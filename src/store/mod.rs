//! store
//!
//! Shared-store access for the locking core.
//!
//! All store traffic flows through the [`ScoreStore`] trait, which has
//! two implementations:
//!
//! - [`RedisStore`]: sorted sets on a Redis server (the production
//!   backend, shared across processes)
//! - [`MemoryStore`]: an in-process map (hermetic tests, embedded use)
//!
//! The locking core never issues store commands outside this module.

mod memory_store;
mod redis_store;
mod traits;

use std::sync::Arc;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::{ScoreStore, StoreError};

/// Open the Redis backend for the given URL, ready to share across
/// datasets and locks.
///
/// # Errors
///
/// Returns [`StoreError`] if the URL does not parse.
pub fn connect(url: &str) -> Result<Arc<dyn ScoreStore>, StoreError> {
    Ok(Arc::new(RedisStore::connect(url)?))
}
