//! JSON API route configuration, nested under `/api`.

use crate::api::handlers::{
    analytics_overview_handler, code_analytics_handler, create_url_handler, get_url_handler,
    list_urls_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// JSON API routes.
///
/// # Endpoints
///
/// - `POST /urls`             - Create a short URL
/// - `GET  /urls`             - List short URLs (paginated)
/// - `GET  /urls/{code}`      - Details of a short URL (cache-aside, no click)
/// - `GET  /analytics`        - System-wide totals
/// - `GET  /analytics/{code}` - Click analytics for one code
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route("/urls/{code}", get(get_url_handler))
        .route("/analytics", get(analytics_overview_handler))
        .route("/analytics/{code}", get(code_analytics_handler))
}
