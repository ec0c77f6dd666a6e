//! Repository trait for tracked link data access.

use crate::domain::entities::{NewTrackedLink, TrackedLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for tracked links.
///
/// Links are insert-only: there is no update or delete.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the id is already taken.
    /// Returns [`AppError::StoreUnavailable`] if the write cannot complete.
    async fn create(&self, new_link: NewTrackedLink) -> Result<TrackedLink, AppError>;

    /// Finds a link by its identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(TrackedLink))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<TrackedLink>, AppError>;
}
