//! Database configuration loaded from environment variables
//!
//! Eleven `DB_*` variables describe the connection target and the pool
//! policy. The four pool/timeout values are required integers and
//! fail loudly; the string values are taken verbatim, with a missing
//! variable reading as an empty string.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection parameters for a single database target.
///
/// Built by [`DatabaseConfig::from_env`] and treated as immutable
/// afterwards. `port` stays a string: it is interpolated into the
/// connection URL and parsed by the driver, never by this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Driver/dialect identifier, used as the URL scheme (`mysql`,
    /// `postgres`, `sqlite`, ...).
    pub engine: String,
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Raw driver query-string parameters, passed through unmodified.
    pub params: String,
    /// Upper bound on simultaneously open connections. `0` is passed
    /// through unclamped and yields a pool that can never hand out a
    /// connection.
    pub max_open: u32,
    /// Connections the pool keeps ready for reuse.
    pub max_idle: u32,
    /// Maximum connection age in seconds before recycling; `0` means no limit.
    pub max_lifetime_seconds: u64,
    /// Maximum idle time in seconds before a connection is closed; `0` means no limit.
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Load the configuration from the `DB_*` environment variables.
    ///
    /// The four numeric variables (`DB_MAX_OPEN`, `DB_MAX_IDLE`,
    /// `DB_LIFE_TIME`, `DB_IDLE_TIME`) are required and must parse as
    /// base-10 integers. The string variables are not validated; a missing
    /// one reads as an empty string.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_open = get_env_integer::<u32>("DB_MAX_OPEN")?;
        let max_idle = get_env_integer::<u32>("DB_MAX_IDLE")?;
        let max_lifetime_seconds = get_env_integer::<u64>("DB_LIFE_TIME")?;
        let idle_timeout_seconds = get_env_integer::<u64>("DB_IDLE_TIME")?;

        Ok(DatabaseConfig {
            engine: get_env_or_empty("DB_TYPE"),
            host: get_env_or_empty("DB_HOST"),
            port: get_env_or_empty("DB_PORT"),
            database: get_env_or_empty("DB_NAME"),
            user: get_env_or_empty("DB_USER"),
            password: get_env_or_empty("DB_PASSWORD"),
            params: get_env_or_empty("DB_PARAMS"),
            max_open,
            max_idle,
            max_lifetime_seconds,
            idle_timeout_seconds,
        })
    }

    /// Format the connection URL consumed by the driver:
    /// `{engine}://{user}:{password}@{host}:{port}/{database}?{params}`.
    ///
    /// Pure string interpolation with no escaping: a `:`, `@`, `/` or `?`
    /// inside a field produces a malformed URL that the driver rejects at
    /// open time. The `?` is emitted even when `params` is empty.
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}?{}",
            self.engine, self.user, self.password, self.host, self.port, self.database, self.params
        )
    }
}

// Passwords stay out of logs and error reports.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("params", &self.params)
            .field("max_open", &self.max_open)
            .field("max_idle", &self.max_idle)
            .field("max_lifetime_seconds", &self.max_lifetime_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .finish()
    }
}

// Helper functions for environment variable handling
fn get_env_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

fn get_env_integer<T: FromStr>(key: &str) -> Result<T, ConfigError> {
    let value = env::var(key).map_err(|_| ConfigError::MissingEnvVar {
        var: key.to_string(),
    })?;
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        var: key.to_string(),
        value,
        expected: "a base-10 integer".to_string(),
    })
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid value for {var}: '{value}', expected {expected}")]
    InvalidValue {
        var: String,
        value: String,
        expected: String,
    },
}
