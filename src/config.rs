//! config
//!
//! Configuration for store location, namespace, and default TTL.
//!
//! # Sources
//!
//! Configuration is a plain value handed to [`crate::Locker`] — there is
//! no process-wide singleton. [`Config::load`] reads the first file found
//! at (in order of precedence):
//!
//! 1. `$CORDON_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/cordon/config.toml`
//! 3. `~/.cordon/config.toml`
//!
//! then applies environment overrides:
//!
//! - `CORDON_URL` (falling back to `REDIS_URL`)
//! - `CORDON_NAMESPACE`
//! - `CORDON_TTL` (seconds, fractional allowed)
//!
//! # Validation
//!
//! Values are validated after parsing; a zero, negative, or non-finite
//! TTL and an empty namespace are rejected.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but cannot be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// The file that failed to read
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// The file that failed to parse
        path: PathBuf,
        /// The underlying TOML error
        source: toml::de::Error,
    },

    /// A value is out of range or malformed.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Store location, namespace, and default TTL.
///
/// # Example
///
/// ```toml
/// url = "redis://cache.internal:6379/2"
/// namespace = "billing"
/// default_ttl_secs = 300.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Redis URL for the shared store.
    pub url: String,

    /// Namespace prefix for every key this process builds.
    pub namespace: String,

    /// TTL in seconds applied when no explicit TTL is given.
    pub default_ttl_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1/".to_string(),
            namespace: "cordon".to_string(),
            default_ttl_secs: 60.0,
        }
    }
}

impl Config {
    /// Load configuration from the canonical file locations and the
    /// environment.
    ///
    /// Missing files are not an error — defaults apply. The result is
    /// validated before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unreadable or malformed files, or on
    /// out-of-range values (including from environment overrides).
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file that would be read, honoring precedence.
    fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = env::var("CORDON_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        if let Some(xdg) = dirs::config_dir() {
            let candidate = xdg.join("cordon").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }
        dirs::home_dir().map(|home| home.join(".cordon").join("config.toml"))
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("CORDON_URL").or_else(|_| env::var("REDIS_URL")) {
            self.url = url;
        }
        if let Ok(namespace) = env::var("CORDON_NAMESPACE") {
            self.namespace = namespace;
        }
        if let Ok(ttl) = env::var("CORDON_TTL") {
            self.default_ttl_secs = ttl.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("CORDON_TTL is not a number: '{ttl}'"))
            })?;
        }
        Ok(())
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue("url must not be empty".into()));
        }
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "namespace must not be empty".into(),
            ));
        }
        if !self.default_ttl_secs.is_finite() || self.default_ttl_secs <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "default_ttl_secs must be a positive number, got {}",
                self.default_ttl_secs
            )));
        }
        Ok(())
    }

    /// The default TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs_f64(self.default_ttl_secs)
    }
}
