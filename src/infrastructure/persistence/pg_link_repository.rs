//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{NewTrackedLink, TrackedLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::store::StorePool;

type LinkRow = (String, String, DateTime<Utc>);

fn into_link((id, destination_url, created_at): LinkRow) -> TrackedLink {
    TrackedLink::new(id, destination_url, created_at)
}

/// PostgreSQL repository for tracked links.
///
/// Every call runs on its own store session.
pub struct PgLinkRepository {
    store: StorePool,
}

impl PgLinkRepository {
    pub fn new(store: StorePool) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewTrackedLink) -> Result<TrackedLink, AppError> {
        let mut session = self.store.acquire().await?;

        let row: LinkRow = sqlx::query_as(
            r#"
            INSERT INTO links (id, destination_url)
            VALUES ($1, $2)
            RETURNING id, destination_url, created_at
            "#,
        )
        .bind(&new_link.id)
        .bind(&new_link.destination_url)
        .fetch_one(&mut *session)
        .await?;

        Ok(into_link(row))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TrackedLink>, AppError> {
        let mut session = self.store.acquire().await?;

        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, destination_url, created_at
            FROM links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *session)
        .await?;

        Ok(row.map(into_link))
    }
}
