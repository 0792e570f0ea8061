//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State, rejection::PathRejection},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Build a click event from the peer address, `User-Agent` and `Referer`
/// 2. Resolve through [`crate::application::services::RedirectService`]
///    (cache first, store on miss)
/// 3. Return `301 Moved Permanently` with `Location`
///
/// # Errors
///
/// Returns 404 Not Found with `{"details": {"code": ...}}` if the code doesn't exist.
pub async fn redirect_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    code: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(code) = code?;
    let event = ClickEvent::new(
        code,
        addr.ip().to_string(),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    let original_url = state.redirect_service.resolve(event).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, original_url)],
    ))
}
