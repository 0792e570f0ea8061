//! Handlers for URL creation, listing and lookup.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::api::dto::urls::{
    CreateUrlRequest, CreateUrlResponse, UrlDetailsResponse, UrlListResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "customAlias": "promo" }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// {
///   "shortCode": "promo",
///   "shortUrl": "http://localhost:3000/promo",
///   "originalUrl": "https://example.com",
///   "createdAt": "2025-01-01T12:00:00.000Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body, invalid URL, invalid or reserved alias
/// - 409 if the alias is already taken
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let created = state
        .url_service
        .shorten(payload.url, payload.custom_alias)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Lists short URLs, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?page=1&limit=10`
///
/// # Query Parameters
///
/// - `page` (optional): Page number, from 1 (default: 1)
/// - `limit` (optional): Items per page, 1-100 (default: 10)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are not numbers or are out of range.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<UrlListResponse>, AppError> {
    let Query(params) = params?;
    let (page, limit) = params
        .validate()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let result = state.url_service.list(page, limit).await?;

    Ok(Json(UrlListResponse {
        urls: result.records.into_iter().map(Into::into).collect(),
        pagination: PaginationMeta::new(page, limit, result.total),
    }))
}

/// Returns the details of one short URL without counting a click.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// `source` tells whether the answer came from the `cache` or the `database`.
pub async fn get_url_handler(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> Result<Json<UrlDetailsResponse>, AppError> {
    let Path(code) = code?;
    let resolved = state.redirect_service.lookup(&code).await?;
    Ok(Json(resolved.into()))
}
