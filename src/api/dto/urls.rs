//! DTOs for URL creation, listing and lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::iso_millis;
use crate::api::dto::pagination::PaginationMeta;
use crate::application::services::{CreatedUrl, ResolvedUrl};
use crate::domain::entities::UrlRecord;
use crate::utils::code_generator::ALIAS_PATTERN;

/// Request body of `POST /api/urls`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    /// Destination; scheme and syntax are checked by the service.
    #[validate(length(max = 2048))]
    pub url: String,

    /// Optional custom short code.
    #[validate(length(min = 3, max = 20), regex(path = *ALIAS_PATTERN))]
    pub custom_alias: Option<String>,
}

/// Response body of `POST /api/urls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl From<CreatedUrl> for CreateUrlResponse {
    fn from(created: CreatedUrl) -> Self {
        Self {
            short_code: created.record.short_code,
            short_url: created.short_url,
            original_url: created.record.original_url,
            created_at: created.record.created_at,
        }
    }
}

/// A record as listed by `GET /api/urls` and the analytics overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSummary {
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for UrlSummary {
    fn from(record: UrlRecord) -> Self {
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
            clicks: record.click_count,
            created_at: record.created_at,
        }
    }
}

/// Response body of `GET /api/urls`.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<UrlSummary>,
    pub pagination: PaginationMeta,
}

/// Response body of `GET /api/urls/{code}`.
///
/// `createdAt` is omitted when the answer came from the cache.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlDetailsResponse {
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    #[serde(
        with = "iso_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    pub source: &'static str,
}

impl From<ResolvedUrl> for UrlDetailsResponse {
    fn from(resolved: ResolvedUrl) -> Self {
        Self {
            short_code: resolved.short_code,
            original_url: resolved.original_url,
            clicks: resolved.click_count,
            created_at: resolved.created_at,
            source: resolved.source.as_str(),
        }
    }
}
