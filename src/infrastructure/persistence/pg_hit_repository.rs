//! PostgreSQL implementation of hit repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::Hit;
use crate::domain::repositories::HitRepository;
use crate::error::AppError;
use crate::infrastructure::store::StorePool;

/// PostgreSQL repository for hit events.
///
/// Expiry relies on `hits_date_time_idx`; deletes are bounded by `LIMIT` so a
/// single sweep statement never holds row locks on the whole table.
pub struct PgHitRepository {
    store: StorePool,
}

impl PgHitRepository {
    pub fn new(store: StorePool) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HitRepository for PgHitRepository {
    async fn record(&self, hit: Hit) -> Result<(), AppError> {
        let mut session = self.store.acquire().await?;

        sqlx::query("INSERT INTO hits (link_id, date_time) VALUES ($1, $2)")
            .bind(&hit.link_id)
            .bind(hit.date_time)
            .execute(&mut *session)
            .await?;

        Ok(())
    }

    async fn list_since(&self, link_id: &str, since: DateTime<Utc>) -> Result<Vec<Hit>, AppError> {
        let mut session = self.store.acquire().await?;

        let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT link_id, date_time
            FROM hits
            WHERE link_id = $1 AND date_time > $2
            ORDER BY date_time DESC
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(&mut *session)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(link_id, date_time)| Hit::new(link_id, date_time))
            .collect())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<u64, AppError> {
        let mut session = self.store.acquire().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM hits
            WHERE id IN (
                SELECT id
                FROM hits
                WHERE date_time <= $1
                ORDER BY date_time
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .execute(&mut *session)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ensure_expiry_index(&self) -> Result<(), AppError> {
        // CONCURRENTLY cannot run inside a transaction block; a single
        // simple-protocol statement on the pool runs outside one.
        sqlx::raw_sql(
            "CREATE INDEX CONCURRENTLY IF NOT EXISTS hits_date_time_idx ON hits (date_time)",
        )
        .execute(self.store.pool())
        .await?;

        Ok(())
    }
}
