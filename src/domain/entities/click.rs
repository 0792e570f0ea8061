//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A click recorded when a short code is resolved through a redirect.
///
/// Append-only. Captures the client metadata available on the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    #[allow(dead_code)]
    pub id: i64,
    pub short_code: String,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub source_ip: String,
}

impl Click {
    pub fn new(
        id: i64,
        short_code: String,
        clicked_at: DateTime<Utc>,
        user_agent: Option<String>,
        referer: Option<String>,
        source_ip: String,
    ) -> Self {
        Self {
            id,
            short_code,
            clicked_at,
            user_agent,
            referer,
            source_ip,
        }
    }
}

/// Input data for appending a click event.
///
/// `clicked_at` is taken when the redirect was served, not when the event is
/// persisted, so queued events keep their real time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub short_code: String,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub source_ip: String,
}

/// Number of clicks sharing a user agent.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAgentCount {
    pub user_agent: Option<String>,
    pub count: i64,
}

/// Number of clicks on a calendar day (UTC, `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}
