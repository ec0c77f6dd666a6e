//! Repository trait for hit events.

use crate::domain::entities::Hit;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for recorded hits.
///
/// Hits are append-only from the request path and removed only by the
/// retention sweep.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HitRepository: Send + Sync {
    /// Appends one hit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the write cannot complete.
    async fn record(&self, hit: Hit) -> Result<(), AppError>;

    /// Lists hits of a link strictly newer than `since`, newest first.
    async fn list_since(&self, link_id: &str, since: DateTime<Utc>) -> Result<Vec<Hit>, AppError>;

    /// Deletes up to `limit` hits with `date_time <= cutoff`.
    ///
    /// Returns the number of rows removed. Must not lock the whole collection.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<u64, AppError>;

    /// Ensures the index backing expiry on `date_time` exists.
    ///
    /// Idempotent and safe to call on every process start.
    async fn ensure_expiry_index(&self) -> Result<(), AppError>;
}
