//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: store reachable and click queue open
/// - **503 Service Unavailable**: store unreachable or click queue closed
///
/// The cache never makes the service unhealthy: every request falls back to
/// the store when it is down. Its status is reported for information.
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "timestamp": "2025-01-01T12:00:00.000Z",
///   "uptime": 12.5,
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "redis reachable" },
///     "clickQueue": { "status": "ok", "message": "0/10000 pending" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;
    let click_queue = check_click_queue(&state);

    let healthy = database.is_ok() && click_queue.is_ok();

    let response = HealthResponse {
        status: if healthy { "OK" } else { "degraded" },
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            database,
            cache,
            click_queue,
        },
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.url_service.ping_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend_name();
    if state.cache.health_check().await {
        CheckStatus::ok(format!("{} reachable", backend))
    } else {
        CheckStatus::error(format!("{} unreachable, serving from database", backend))
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    let sender = &state.click_sender;
    if sender.is_closed() {
        return CheckStatus::error("Click queue is closed");
    }

    let max = sender.max_capacity();
    let pending = max - sender.capacity();
    CheckStatus::ok(format!("{}/{} pending", pending, max))
}
