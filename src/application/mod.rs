//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! the cache, and validation rules. Services consume repository traits and
//! provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation and listing
//! - [`services::redirect_service::RedirectService`] - Cache-aside redirect resolution
//! - [`services::analytics_service::AnalyticsService`] - Click analytics

pub mod services;
