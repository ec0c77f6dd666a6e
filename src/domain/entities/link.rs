//! Tracked link entity.

use chrono::{DateTime, Utc};

/// A registered destination whose clicks are tracked.
///
/// Records are immutable after creation and never evicted, so an `id` is
/// never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLink {
    pub id: String,
    pub destination_url: String,
    pub created_at: DateTime<Utc>,
}

impl TrackedLink {
    /// Creates a new TrackedLink instance.
    pub fn new(id: String, destination_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            destination_url,
            created_at,
        }
    }

    /// Public URL that redirects through the tracker to the destination.
    pub fn tracking_url(&self, public_base_url: &str) -> String {
        format!("{}/g?id={}", public_base_url.trim_end_matches('/'), self.id)
    }
}

/// Input data for persisting a new link.
#[derive(Debug, Clone)]
pub struct NewTrackedLink {
    pub id: String,
    pub destination_url: String,
}
