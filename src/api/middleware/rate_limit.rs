//! Per-IP rate limiting using the token bucket algorithm.

use axum::{http::StatusCode, response::IntoResponse, response::Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

use crate::error::AppError;

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for the redirect endpoint.
///
/// # Limits
///
/// - **Rate**: 20 requests per second (one token every 50 ms)
/// - **Burst**: 200 requests
///
/// Keyed by the socket peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn layer() -> IpGovernorLayer {
    build(50, 200)
}

/// Stricter rate limiter for the JSON API.
///
/// # Limits
///
/// - **Rate**: 2 requests per second (one token every 500 ms)
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn api_layer() -> IpGovernorLayer {
    build(500, 100)
}

/// `replenish_millis` is the interval after which one more request is allowed,
/// not a rate.
fn build(replenish_millis: u64, burst_size: u32) -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_millis)
            .burst_size(burst_size)
            .finish()
            .expect("non-zero rate limit parameters"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rewrites the limiter's plain-text 429 into the standard error body.
///
/// Rate limit headers set by the limiter (`retry-after`, `x-ratelimit-*`) are kept.
///
/// ```rust,ignore
/// router.layer(axum::middleware::map_response(rate_limit::json_rejection))
/// ```
pub async fn json_rejection(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let (mut parts, _) = response.into_parts();
    let body = AppError::rate_limited(
        "Too many requests, please try again later.",
        json!({ "retryAfter": retry_after }),
    )
    .into_response();

    let (body_parts, body) = body.into_parts();
    parts.headers.extend(body_parts.headers);
    Response::from_parts(parts, body)
}
