//! Handler for tracked redirects.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Query parameters of the redirect endpoint.
#[derive(Debug, Deserialize)]
pub struct RedirectParams {
    pub id: Option<String>,
}

/// Redirects a tracking identifier to its destination.
///
/// # Endpoint
///
/// `GET /g?id={id}`
///
/// # Request Flow
///
/// 1. Extract the identifier (a missing one is treated as unknown)
/// 2. Look up the tracked link
/// 3. Queue a hit for the background worker (non-blocking)
/// 4. Return 302 Found
///
/// The hit is only queued here; its write happens after the response is on
/// its way and its failure never reaches the client.
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is unknown.
/// Returns 500 if the store cannot be queried.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Query(params): Query<RedirectParams>,
) -> Result<Response, AppError> {
    let id = params.id.unwrap_or_default();
    track_and_redirect(&state, &id).await
}

/// Path form of [`redirect_handler`].
///
/// # Endpoint
///
/// `GET /g/{id}`
pub async fn redirect_path_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    track_and_redirect(&state, &id).await
}

async fn track_and_redirect(state: &AppState, id: &str) -> Result<Response, AppError> {
    let link = match state.registry.lookup(id).await {
        Ok(link) => link,
        Err(e @ AppError::NotFound { .. }) => {
            debug!(id, "Unknown tracking identifier");
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let location = location_header(&link.destination_url)?;

    state.registry.record_hit(&link.id, Utc::now());

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the `Location` value. ASCII destinations go out verbatim; anything
/// else is percent-encoded via `url`, since `HeaderValue` would accept raw
/// UTF-8 as opaque bytes.
fn location_header(destination: &str) -> Result<HeaderValue, AppError> {
    if destination.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(destination) {
            return Ok(value);
        }
    }

    Url::parse(destination)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored destination cannot be used as a redirect target",
                json!({ "destination_url": destination }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_header_verbatim() {
        let value = location_header("https://example.com/page?a=1").unwrap();
        assert_eq!(value, "https://example.com/page?a=1");
    }

    #[test]
    fn test_location_header_encodes_non_ascii() {
        let value = location_header("https://example.com/caf\u{e9}").unwrap();
        assert_eq!(value, "https://example.com/caf%C3%A9");
    }

    #[test]
    fn test_location_header_output_is_ascii() {
        let value = location_header("https://例え.jp/パス?q=ü").unwrap();
        assert!(value.as_bytes().is_ascii());
        assert!(value.to_str().unwrap().starts_with("https://xn--"));
    }
}
