//! Connection lifecycle management
//!
//! [`ConnectionManager`] owns a [`DatabaseConfig`] and, once opened, the
//! live pool built from it. Lifecycle transitions take `&mut self`, so
//! concurrent open/close on a shared manager is a compile error rather than
//! a race; the pool handle itself stays internally thread-safe and can be
//! cloned out for concurrent query use.

use std::time::Duration;

use sqlx::AnyPool;

use crate::config::{ConfigError, DatabaseConfig};
use crate::pool::{connect_pool, PoolError};

/// Holds connection configuration and the optional live pool opened from it.
#[derive(Debug)]
pub struct ConnectionManager {
    config: DatabaseConfig,
    pool: Option<AnyPool>,
}

impl ConnectionManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config, pool: None }
    }

    /// Build a manager from the `DB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(DatabaseConfig::from_env()?))
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Replace the configuration used by the next [`open`](Self::open).
    /// The held pool, if any, is untouched until then.
    pub fn set_config(&mut self, config: DatabaseConfig) {
        self.config = config;
    }

    /// The held pool, if the manager is currently open.
    pub fn pool(&self) -> Option<&AnyPool> {
        self.pool.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pool.is_some()
    }

    /// Open (or re-open) the pool from the stored configuration.
    ///
    /// Any previously held pool is closed first, then a fresh connect runs.
    /// On failure the manager is left holding no pool at all; the prior
    /// handle is gone even if it was working. Re-opening keeps the old pool
    /// from leaking across a configuration refresh; it does not keep the
    /// old pool around as a fallback.
    pub async fn open(&mut self) -> Result<(), PoolError> {
        self.close().await;

        let pool = self.connect().await?;
        self.pool = Some(pool);
        Ok(())
    }

    /// Close and drop the held pool, waiting for a graceful shutdown.
    /// A no-op when nothing is open; never fails, safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(pool) = self.pool.take() {
            tracing::debug!("Closing database pool");
            pool.close().await;
        }
    }

    /// One-shot connect from the stored configuration. The caller owns the
    /// returned pool; the manager does not keep a reference to it.
    pub async fn connect(&self) -> Result<AnyPool, PoolError> {
        connect_pool(&self.config.url(), &self.config).await
    }

    /// Probe the held pool, returning the round-trip time.
    pub async fn ping(&self) -> Result<Duration, PoolError> {
        match &self.pool {
            Some(pool) => crate::pool::ping(pool).await,
            None => Err(PoolError::PoolClosed),
        }
    }
}
