//! Repository trait for click events and their aggregates.

use crate::domain::entities::{Click, DailyCount, NewClick, UserAgentCount};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only store of click events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a click
    /// referencing an unknown short code.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts every click event in the system.
    async fn count_all(&self) -> Result<i64, AppError>;

    /// Counts clicks on `code` at or after `since`.
    async fn count_since(&self, code: &str, since: DateTime<Utc>) -> Result<i64, AppError>;

    /// Most frequent user agents for `code`, highest count first.
    async fn top_user_agents(&self, code: &str, limit: i64)
    -> Result<Vec<UserAgentCount>, AppError>;

    /// Clicks per UTC day for `code` since `since`, oldest day first.
    async fn clicks_by_date(
        &self,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError>;

    /// Latest click events for `code`, newest first.
    async fn recent(&self, code: &str, limit: i64) -> Result<Vec<Click>, AppError>;
}
