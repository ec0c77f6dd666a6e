//! DTOs for raw hit listing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Hit;

#[derive(Debug, Serialize)]
pub struct HitsResponse {
    pub link_id: String,
    pub retention_days: i64,
    pub total: usize,
    pub hits: Vec<HitItem>,
}

#[derive(Debug, Serialize)]
pub struct HitItem {
    pub date_time: DateTime<Utc>,
}

impl From<Hit> for HitItem {
    fn from(hit: Hit) -> Self {
        Self {
            date_time: hit.date_time,
        }
    }
}
