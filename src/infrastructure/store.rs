//! Store connection management.
//!
//! One root pool is dialed during startup, before any listener exists, and
//! shared read-only by clone afterwards. Each store operation works on its own
//! [`StoreSession`], checked out from the pool and released on drop, so no
//! session is ever shared between concurrent requests.
//!
//! The pool bound (`DB_MAX_CONNECTIONS`) is the only limit enforced; requests
//! beyond it wait for a session up to the acquire timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;

use crate::config::{Config, mask_connection_string};
use crate::error::{AppError, FatalError};

/// A per-request store session, returned to the pool when dropped.
pub type StoreSession = PoolConnection<Postgres>;

/// Reachability probe used by the healthcheck.
#[async_trait]
pub trait StoreProbe: Send + Sync {
    /// Succeeds if a session can be acquired and a no-op query answered.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Root connection pool to the PostgreSQL store.
#[derive(Clone, Debug)]
pub struct StorePool {
    pool: PgPool,
}

impl StorePool {
    /// Dials the store once.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::StoreUnreachable`] if the initial dial fails.
    /// Nothing downstream works without storage, so callers treat this as fatal.
    pub async fn connect(config: &Config) -> Result<Self, FatalError> {
        let url = config
            .connection_url()
            .unwrap_or_else(|_| config.database_url.clone());
        let endpoint = mask_connection_string(&url);

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
            .connect(&url)
            .await
            .map_err(|source| FatalError::StoreUnreachable {
                endpoint: endpoint.clone(),
                source,
            })?;

        tracing::info!(store = %endpoint, "Connected to store");

        Ok(Self { pool })
    }

    /// Wraps an existing pool, e.g. one provided by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Checks out a session for one request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if no session can be acquired.
    pub async fn acquire(&self) -> Result<StoreSession, AppError> {
        self.pool.acquire().await.map_err(|e| {
            AppError::store_unavailable(
                "Store session unavailable",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Underlying pool, for migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Closes every session; used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StoreProbe for StorePool {
    async fn ping(&self) -> Result<(), AppError> {
        let mut session = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *session).await?;
        Ok(())
    }
}
