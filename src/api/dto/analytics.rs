//! DTOs for analytics endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::dto::iso_millis;
use crate::api::dto::urls::UrlSummary;
use crate::application::services::{CodeAnalytics, Overview};
use crate::domain::entities::{Click, DailyCount, UserAgentCount};

/// Response body of `GET /api/analytics`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub avg_clicks_per_url: f64,
    pub recent_urls: Vec<UrlSummary>,
}

impl From<Overview> for OverviewResponse {
    fn from(o: Overview) -> Self {
        Self {
            total_urls: o.total_urls,
            total_clicks: o.total_clicks,
            avg_clicks_per_url: o.avg_clicks_per_url,
            recent_urls: o.recent_urls.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body of `GET /api/analytics/{code}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalyticsResponse {
    pub short_code: String,
    pub original_url: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub total_clicks: i64,
    pub statistics: WindowStats,
    pub top_browsers: Vec<BrowserStat>,
    pub clicks_by_date: Vec<DateStat>,
    pub recent_clicks: Vec<RecentClick>,
}

#[derive(Debug, Serialize)]
pub struct WindowStats {
    #[serde(rename = "last24h")]
    pub last_24h: i64,
    #[serde(rename = "last7d")]
    pub last_7d: i64,
    #[serde(rename = "last30d")]
    pub last_30d: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserStat {
    pub user_agent: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DateStat {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClick {
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: String,
}

impl From<UserAgentCount> for BrowserStat {
    fn from(u: UserAgentCount) -> Self {
        Self {
            user_agent: u.user_agent,
            count: u.count,
        }
    }
}

impl From<DailyCount> for DateStat {
    fn from(d: DailyCount) -> Self {
        Self {
            date: d.date,
            count: d.count,
        }
    }
}

impl From<Click> for RecentClick {
    fn from(c: Click) -> Self {
        Self {
            timestamp: c.clicked_at,
            user_agent: c.user_agent,
            referer: c.referer,
            ip: c.source_ip,
        }
    }
}

impl From<CodeAnalytics> for CodeAnalyticsResponse {
    fn from(a: CodeAnalytics) -> Self {
        Self {
            short_code: a.record.short_code,
            original_url: a.record.original_url,
            created_at: a.record.created_at,
            total_clicks: a.record.click_count,
            statistics: WindowStats {
                last_24h: a.windows.last_24h,
                last_7d: a.windows.last_7d,
                last_30d: a.windows.last_30d,
            },
            top_browsers: a.top_user_agents.into_iter().map(Into::into).collect(),
            clicks_by_date: a.clicks_by_date.into_iter().map(Into::into).collect(),
            recent_clicks: a.recent_clicks.into_iter().map(Into::into).collect(),
        }
    }
}
