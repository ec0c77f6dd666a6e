//! Handler for raw hit listing.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::hits::{HitItem, HitsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the retained hits of one tracked link, newest first.
///
/// # Endpoint
///
/// `GET /url/{id}/hits`
///
/// Hits older than the retention window are never returned, even if the
/// sweep has not removed them yet.
///
/// # Errors
///
/// Returns 404 Not Found if the link is unknown.
pub async fn hits_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HitsResponse>, AppError> {
    let hits = state.registry.hits_for(&id).await?;

    Ok(Json(HitsResponse {
        link_id: id,
        retention_days: state.registry.retention().window_days(),
        total: hits.len(),
        hits: hits.into_iter().map(HitItem::from).collect(),
    }))
}
