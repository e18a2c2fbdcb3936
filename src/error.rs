//! error
//!
//! Top-level error type for the facade surface.
//!
//! The core types ([`crate::Dataset`], [`crate::Lock`]) return
//! [`StoreError`] directly — their only failure mode is the store. The
//! facade adds caller-misuse and configuration failures, aggregated
//! here. One outcome is deliberately *not* an error: a lock being
//! unavailable is reported as `Ok(None)` by the scoped-execution calls.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors from the `cordon` facade.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed too few segments to build a lock path.
    /// Surfaced immediately, never retried.
    #[error("invalid lock path: {0}")]
    Usage(String),

    /// A store operation failed; propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_display() {
        let err = Error::Usage("need at least 2 segments".into());
        assert!(err.to_string().contains("invalid lock path"));
        assert!(err.to_string().contains("2 segments"));
    }

    #[test]
    fn store_error_passes_through_transparently() {
        let err = Error::from(StoreError::Backend("boom".into()));
        assert_eq!(err.to_string(), "store backend error: boom");
    }
}
