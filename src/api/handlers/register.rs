//! Handler for link registration.

use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{HeaderMap, StatusCode, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::register::{RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registration body, decoded from JSON or from an urlencoded form depending
/// on `Content-Type`.
#[derive(Debug)]
pub struct RegisterPayload(pub RegisterRequest);

impl<S> FromRequest<S> for RegisterPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request = if is_json_content_type(req.headers()) {
            let Json(request) = Json::<RegisterRequest>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::bad_request("Invalid JSON body", json!({ "reason": e.body_text() }))
                })?;
            request
        } else {
            let Form(request) = Form::<RegisterRequest>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::bad_request("Invalid form body", json!({ "reason": e.body_text() }))
                })?;
            request
        };

        Ok(Self(request))
    }
}

/// Media types are case-insensitive; parameters such as `charset` are ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    media_type.eq_ignore_ascii_case("application/json")
        || media_type
            .get(media_type.len().saturating_sub(5)..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case("+json"))
}

/// Registers a destination URL for tracking.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// or `url=https%3A%2F%2Fexample.com%2Fpage` as
/// `application/x-www-form-urlencoded`.
///
/// # Response
///
/// 201 Created:
///
/// ```json
/// {
///   "id": "q9Xz0bLw3kPa",
///   "destination_url": "https://example.com/page",
///   "tracking_url": "http://localhost:8080/g?id=q9Xz0bLw3kPa",
///   "created_at": "2024-06-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed body or an empty/invalid URL.
/// Returns 500 Internal Server Error if the store write fails.
pub async fn register_handler(
    State(state): State<AppState>,
    RegisterPayload(payload): RegisterPayload,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate()?;

    let link = state.registry.create(&payload.url).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse::from_link(link, &state.public_base_url)),
    ))
}
