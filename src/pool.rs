//! Pool opening and liveness probing
//!
//! `connect_pool` is the factory's core: a lazy driver open with the pool
//! policy applied, followed by one real round trip to the server. A pool
//! that fails its first probe is closed before the error is returned, so a
//! failed connect never leaks a half-open pool.

use std::sync::Once;
use std::time::{Duration, Instant};

pub use sqlx::AnyPool;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::Connection;

use crate::config::DatabaseConfig;

/// Connection pool error types
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Driver rejected connection string: {0}")]
    DriverOpen(sqlx::Error),

    #[error("Liveness probe failed: {0}")]
    Ping(sqlx::Error),

    #[error("Pool is closed")]
    PoolClosed,
}

/// Open a pool for `url` with the pool policy from `config`, then verify
/// the server is reachable.
///
/// The open itself is lazy: the driver validates the URL and selects a
/// backend from the scheme without touching the network. The four pool
/// values map onto the driver's policy knobs (`max_open` →
/// `max_connections`, `max_idle` → `min_connections`, the two second counts
/// → `max_lifetime`/`idle_timeout`, with `0` meaning no limit). The first
/// network I/O is the liveness probe; if that fails, the pool is closed and
/// the error returned. No retry is performed at any stage.
pub async fn connect_pool(url: &str, config: &DatabaseConfig) -> Result<AnyPool, PoolError> {
    ensure_drivers();

    tracing::debug!(
        "Opening database pool for {} with max_open={}, max_idle={}, max_lifetime={}s, idle_timeout={}s",
        redact(url),
        config.max_open,
        config.max_idle,
        config.max_lifetime_seconds,
        config.idle_timeout_seconds
    );

    let options = AnyPoolOptions::new()
        .max_connections(config.max_open)
        .min_connections(config.max_idle)
        .max_lifetime(duration_or_unlimited(config.max_lifetime_seconds))
        .idle_timeout(duration_or_unlimited(config.idle_timeout_seconds));

    // Lazy: validates the connection string, no network I/O yet.
    let pool = options.connect_lazy(url).map_err(|e| {
        tracing::error!("Driver rejected connection string for {}: {}", redact(url), e);
        PoolError::DriverOpen(e)
    })?;

    match ping(&pool).await {
        Ok(elapsed) => {
            tracing::info!(
                "✅ Database pool ready for {} (probe took {:?})",
                redact(url),
                elapsed
            );
            Ok(pool)
        }
        Err(e) => {
            let error = release_failed_pool(pool, e).await;
            tracing::error!("Liveness probe failed for {}: {}", redact(url), error);
            Err(error)
        }
    }
}

/// Probe the pool with one real round trip and report how long it took.
///
/// For network engines this is a protocol-level ping on a pooled
/// connection, so it also exercises connection establishment and
/// authentication the first time it runs.
pub async fn ping(pool: &AnyPool) -> Result<Duration, PoolError> {
    if pool.is_closed() {
        return Err(PoolError::PoolClosed);
    }

    let start = Instant::now();

    let mut conn = pool.acquire().await.map_err(classify_probe_error)?;
    conn.ping().await.map_err(classify_probe_error)?;

    let elapsed = start.elapsed();
    tracing::debug!("Database liveness probe passed in {:?}", elapsed);
    Ok(elapsed)
}

/// Install the sqlx Any drivers once per process.
fn ensure_drivers() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(install_default_drivers);
}

/// A failed liveness check must not leave connections behind: close the
/// pool in full, then pass the error through to the caller.
async fn release_failed_pool(pool: AnyPool, error: PoolError) -> PoolError {
    pool.close().await;
    error
}

/// Split probe failures into the two stages callers care about: the driver
/// refusing the URL or engine (its registry resolves on first acquire) vs.
/// the server being unreachable or rejecting the credentials.
fn classify_probe_error(error: sqlx::Error) -> PoolError {
    match &error {
        sqlx::Error::Configuration(_) => PoolError::DriverOpen(error),
        _ => PoolError::Ping(error),
    }
}

/// sqlx expresses "no limit" as `None`; the environment expresses it as `0`.
fn duration_or_unlimited(seconds: u64) -> Option<Duration> {
    if seconds > 0 {
        Some(Duration::from_secs(seconds))
    } else {
        None
    }
}

// Credentials stay out of the logs.
fn redact(url: &str) -> &str {
    url.split('@').last().unwrap_or(url)
}
