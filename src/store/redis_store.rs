//! store::redis_store
//!
//! Redis sorted-set backend for [`ScoreStore`].
//!
//! # Command mapping
//!
//! | Trait operation      | Redis command                          |
//! |----------------------|----------------------------------------|
//! | `add_if_absent`      | `ZADD key NX score member ...`         |
//! | `remove`             | `ZREM`                                 |
//! | `score` / `scores`   | `ZSCORE` / `ZMSCORE`                   |
//! | `remove_below`       | `ZREMRANGEBYSCORE key -inf (cutoff`    |
//! | `count_in_range`     | `ZCOUNT`                               |
//! | `members_in_range`   | `ZRANGEBYSCORE`                        |
//! | `cardinality`        | `ZCARD`                                |
//! | `delete`             | `DEL`                                  |
//! | `keys_with_prefix`   | `KEYS prefix*`                         |
//!
//! `ZADD NX` is what makes acquisition safe across processes: Redis
//! applies the whole batch atomically and reports how many members were
//! actually new, so exactly one of two racing callers wins each member.

use redis::{Client, Commands, Connection};

use super::traits::{ScoreStore, StoreError};

/// A [`ScoreStore`] backed by a Redis server.
///
/// Holds only the client handle; each operation checks out a connection
/// scoped to that one call. There is no retry layer and no timeout layer
/// here. Callers that need bounded latency configure it on the Redis URL
/// (e.g. via `connect_timeout`) or at the network level.
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Create a store for the given Redis URL.
    ///
    /// Parses and validates the URL but does not open a connection;
    /// connections are established per operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Command`] if the URL does not parse.
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }

    fn conn(&self) -> Result<Connection, StoreError> {
        Ok(self.client.get_connection()?)
    }
}

/// Render a score as a Redis range bound.
fn bound(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}

impl ScoreStore for RedisStore {
    fn add_if_absent(&self, key: &str, entries: &[(f64, &str)]) -> Result<u64, StoreError> {
        // ZADD with zero members is a protocol error.
        if entries.is_empty() {
            return Ok(0);
        }
        let mut cmd = redis::cmd("ZADD");
        cmd.arg(key).arg("NX");
        for (score, member) in entries {
            cmd.arg(*score).arg(*member);
        }
        Ok(cmd.query(&mut self.conn()?)?)
    }

    fn remove(&self, key: &str, members: &[&str]) -> Result<u64, StoreError> {
        if members.is_empty() {
            return Ok(0);
        }
        Ok(self.conn()?.zrem(key, members)?)
    }

    fn score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        Ok(self.conn()?.zscore(key, member)?)
    }

    fn scores(&self, key: &str, members: &[&str]) -> Result<Vec<Option<f64>>, StoreError> {
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("ZMSCORE");
        cmd.arg(key);
        for member in members {
            cmd.arg(*member);
        }
        Ok(cmd.query(&mut self.conn()?)?)
    }

    fn remove_below(&self, key: &str, cutoff: f64) -> Result<u64, StoreError> {
        // The `(` prefix makes the upper bound exclusive: only scores
        // strictly below the cutoff are removed.
        Ok(self
            .conn()?
            .zrembyscore(key, "-inf", format!("({}", cutoff))?)
    }

    fn count_in_range(&self, key: &str, min: f64, max: f64) -> Result<u64, StoreError> {
        Ok(self.conn()?.zcount(key, bound(min), bound(max))?)
    }

    fn members_in_range(&self, key: &str, min: f64, max: f64) -> Result<Vec<String>, StoreError> {
        Ok(self.conn()?.zrangebyscore(key, bound(min), bound(max))?)
    }

    fn cardinality(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self.conn()?.zcard(key)?)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let removed: u64 = self.conn()?.del(key)?;
        Ok(removed > 0)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.conn()?.keys(format!("{prefix}*"))?)
    }
}
