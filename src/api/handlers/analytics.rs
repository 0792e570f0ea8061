//! Handlers for click analytics.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::api::dto::analytics::{CodeAnalyticsResponse, OverviewResponse};
use crate::error::AppError;
use crate::state::AppState;

/// System-wide totals and the five newest URLs.
///
/// # Endpoint
///
/// `GET /api/analytics`
///
/// # Response
///
/// ```json
/// {
///   "totalUrls": 3,
///   "totalClicks": 2,
///   "avgClicksPerUrl": 0.67,
///   "recentUrls": [ { "shortCode": "abc1234", "originalUrl": "...", "clicks": 1, "createdAt": "..." } ]
/// }
/// ```
pub async fn analytics_overview_handler(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    let overview = state.analytics_service.overview().await?;
    Ok(Json(overview.into()))
}

/// Click analytics for one short code.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}`
///
/// Includes windowed counts (24h, 7d, 30d), the ten most common user agents,
/// daily counts for the last seven days and the 100 latest clicks.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
pub async fn code_analytics_handler(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> Result<Json<CodeAnalyticsResponse>, AppError> {
    let Path(code) = code?;
    let analytics = state.analytics_service.for_code(&code).await?;
    Ok(Json(analytics.into()))
}
