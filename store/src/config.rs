//! Configuration for the todo store server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file is honoured by the binary through `dotenvy` before this runs.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
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

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Path prefix the todo routes are mounted under (empty for none)
    pub api_prefix: String,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// Load demo todos at startup
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: String::new(),
            shutdown_timeout: Duration::from_secs(10),
            seed_demo: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TODO_HOST` | `0.0.0.0` |
    /// | `TODO_PORT` | `8080` |
    /// | `TODO_API_PREFIX` | empty |
    /// | `TODO_SHUTDOWN_TIMEOUT_SECS` | `10` |
    /// | `TODO_SEED_DEMO` | `false` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric or boolean variable
    /// does not parse.
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

        Ok(Self {
            host: lookup("TODO_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "TODO_PORT")?.unwrap_or(defaults.port),
            api_prefix: lookup("TODO_API_PREFIX")
                .map(|prefix| normalize_prefix(&prefix))
                .unwrap_or(defaults.api_prefix),
            shutdown_timeout: parse_var(&lookup, "TODO_SHUTDOWN_TIMEOUT_SECS")?
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
            seed_demo: parse_var(&lookup, "TODO_SEED_DEMO")?.unwrap_or(defaults.seed_demo),
        })
    }

    /// Address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `host:port` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "TODO_HOST",
            value: raw,
            reason: e.to_string(),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// `api/` and `/api/` both become `/api`; blank becomes empty.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
