//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /healthcheck`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Store unreachable or hit queue closed
///
/// # Components Checked
///
/// 1. **Store**: Acquires a session and runs `SELECT 1` within the configured deadline
/// 2. **Hit Queue**: Checks the channel is open and reports free capacity
///
/// Read-only, safe for frequent polling.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let queue_check = check_hit_queue(&state);

    let all_healthy = store_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            hit_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    match tokio::time::timeout(state.healthcheck_timeout, state.store.ping()).await {
        Ok(Ok(())) => CheckStatus::ok("Connected"),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Healthcheck store probe failed");
            CheckStatus::error(format!("Store error: {}", e))
        }
        Err(_) => {
            tracing::warn!("Healthcheck store probe timed out");
            CheckStatus::error(format!(
                "Store did not answer within {}ms",
                state.healthcheck_timeout.as_millis()
            ))
        }
    }
}

fn check_hit_queue(state: &AppState) -> CheckStatus {
    if state.registry.hit_queue_open() {
        CheckStatus::ok(format!("Capacity: {}", state.registry.hit_queue_capacity()))
    } else {
        CheckStatus::error("Hit queue is closed")
    }
}
