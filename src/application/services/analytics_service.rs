//! Click analytics service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::domain::entities::{Click, DailyCount, UrlRecord, UserAgentCount};
use crate::domain::repositories::{ClickRepository, UrlRepository};
use crate::error::AppError;

/// Number of newest records included in the overview.
const RECENT_URLS: i64 = 5;
/// Number of user agents in the per-code breakdown.
const TOP_USER_AGENTS: i64 = 10;
/// Number of raw click events returned per code.
const RECENT_CLICKS: i64 = 100;

/// System-wide totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub avg_clicks_per_url: f64,
    pub recent_urls: Vec<UrlRecord>,
}

/// Windowed click counts for a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickWindows {
    pub last_24h: i64,
    pub last_7d: i64,
    pub last_30d: i64,
}

/// Full analytics for a single code.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeAnalytics {
    pub record: UrlRecord,
    pub windows: ClickWindows,
    pub top_user_agents: Vec<UserAgentCount>,
    pub clicks_by_date: Vec<DailyCount>,
    pub recent_clicks: Vec<Click>,
}

/// Read-only analytics over the store.
///
/// Always reads the store directly; analytics never go through the cache.
pub struct AnalyticsService {
    url_repository: Arc<dyn UrlRepository>,
    click_repository: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        click_repository: Arc<dyn ClickRepository>,
    ) -> Self {
        Self {
            url_repository,
            click_repository,
        }
    }

    /// Totals across all records plus the five newest ones.
    ///
    /// `total_clicks` counts the click log, not the per-record counters.
    pub async fn overview(&self) -> Result<Overview, AppError> {
        let (total_urls, total_clicks, recent_urls) = tokio::try_join!(
            self.url_repository.count(),
            self.click_repository.count_all(),
            self.url_repository.list(0, RECENT_URLS),
        )?;

        Ok(Overview {
            total_urls,
            total_clicks,
            avg_clicks_per_url: average(total_clicks, total_urls),
            recent_urls,
        })
    }

    /// Analytics for one code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn for_code(&self, code: &str) -> Result<CodeAnalytics, AppError> {
        let record = self
            .url_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))?;

        let now = Utc::now();
        let day_ago = now - Duration::hours(24);
        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);

        let clicks = &self.click_repository;
        let (last_24h, last_7d, last_30d, top_user_agents, clicks_by_date, recent_clicks) = tokio::try_join!(
            clicks.count_since(code, day_ago),
            clicks.count_since(code, week_ago),
            clicks.count_since(code, month_ago),
            clicks.top_user_agents(code, TOP_USER_AGENTS),
            clicks.clicks_by_date(code, week_ago),
            clicks.recent(code, RECENT_CLICKS),
        )?;

        Ok(CodeAnalytics {
            record,
            windows: ClickWindows {
                last_24h,
                last_7d,
                last_30d,
            },
            top_user_agents,
            clicks_by_date,
            recent_clicks,
        })
    }
}

/// Average rounded to two decimals; zero when there are no records.
fn average(total_clicks: i64, total_urls: i64) -> f64 {
    if total_urls == 0 {
        return 0.0;
    }
    let avg = total_clicks as f64 / total_urls as f64;
    (avg * 100.0).round() / 100.0
}
