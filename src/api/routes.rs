//! Per-listener route tables.
//!
//! The public table is meant to be exposed to the internet; the private one
//! must only be reachable from trusted networks.

use crate::api::handlers::{
    health_handler, hits_handler, redirect_handler, redirect_path_handler, register_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes served on the public listener.
///
/// # Endpoints
///
/// - `GET /g?id={id}` - Record a hit and redirect to the destination
/// - `GET /g/{id}`    - Same, with the id as a path segment
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/g", get(redirect_handler))
        .route("/g/{id}", get(redirect_path_handler))
}

/// Routes served on the private listener.
///
/// # Endpoints
///
/// - `POST /url`           - Register a destination URL
/// - `GET  /url/{id}/hits` - List retained hits of a link
/// - `GET  /healthcheck`   - Store and hit queue health
pub fn private_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(register_handler))
        .route("/url/{id}/hits", get(hits_handler))
        .route("/healthcheck", get(health_handler))
}
