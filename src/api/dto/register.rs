//! DTOs for link registration endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::TrackedLink;

/// Request to track a destination URL.
///
/// Accepted as JSON or as an urlencoded form; both carry a single `url` field.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Destination to redirect to. Syntax is checked by the registry.
    #[validate(length(min = 1, max = 8192, message = "URL must be 1-8192 characters"))]
    pub url: String,
}

/// Newly registered link.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub destination_url: String,
    pub tracking_url: String,
    pub created_at: DateTime<Utc>,
}

impl RegisterResponse {
    pub fn from_link(link: TrackedLink, public_base_url: &str) -> Self {
        let tracking_url = link.tracking_url(public_base_url);
        Self {
            id: link.id,
            destination_url: link.destination_url,
            tracking_url,
            created_at: link.created_at,
        }
    }
}
