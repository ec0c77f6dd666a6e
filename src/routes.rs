//! Top-level routers, one per listener.
//!
//! # Route Structure
//!
//! Public listener (`LINK_TRACKER_PUBADDR`):
//!
//! - `GET  /g?id={id}`     - Tracked redirect
//! - `GET  /g/{id}`        - Tracked redirect, path form
//!
//! Private listener (`LINK_TRACKER_APIADDR`):
//!
//! - `POST /url`           - Link registration
//! - `GET  /url/{id}/hits` - Retained hits of a link
//! - `GET  /healthcheck`   - Store and hit queue health
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging, tagged per listener
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

pub const PUBLIC_LISTENER: &str = "public";
pub const PRIVATE_LISTENER: &str = "private";

/// Router for the public redirect listener.
pub fn public_router(state: AppState) -> Router {
    api::routes::public_routes()
        .with_state(state)
        .layer(tracing::layer(PUBLIC_LISTENER))
}

/// Router for the private registration listener.
pub fn private_router(state: AppState) -> Router {
    api::routes::private_routes()
        .with_state(state)
        .layer(tracing::layer(PRIVATE_LISTENER))
}

/// Wraps a router so `/g/` and `/g` resolve to the same route.
pub fn normalized(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
