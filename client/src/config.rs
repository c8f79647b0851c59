//! Client configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Environment variable name
        key: &'static str,
        /// Raw value found
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the store, including any route prefix
    pub api_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// How long a notice stays up; `None` keeps it until replaced
    pub notice_ttl: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(10),
            notice_ttl: Some(Duration::from_secs(3)),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `TODO_API_URL` (`http://localhost:8080`), `TODO_REQUEST_TIMEOUT_SECS`
    /// (`10`) and `TODO_NOTICE_SECS` (`3`, `0` disables auto-dismiss).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a number does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|value| {
                    value.trim().parse().map_err(|e: std::num::ParseIntError| {
                        ConfigError::Invalid {
                            key,
                            value: value.clone(),
                            reason: e.to_string(),
                        }
                    })
                })
                .transpose()
        };

        Ok(Self {
            api_url: lookup("TODO_API_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            request_timeout: secs("TODO_REQUEST_TIMEOUT_SECS")?
                .map_or(defaults.request_timeout, Duration::from_secs),
            notice_ttl: match secs("TODO_NOTICE_SECS")? {
                None => defaults.notice_ttl,
                Some(0) => None,
                Some(n) => Some(Duration::from_secs(n)),
            },
        })
    }
}
