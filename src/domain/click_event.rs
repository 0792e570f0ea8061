//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory click event passed from the redirect path to the recorder.
///
/// Carries everything needed to persist the click without another lookup.
/// The timestamp is taken at construction, i.e. when the redirect was served.
///
/// # Usage Flow
///
/// 1. Created by the redirect resolver with request metadata
/// 2. Sent to the click channel (non-blocking) on a cache hit, or recorded
///    inline on a cache miss
/// 3. Persisted by [`crate::domain::click_recorder::ClickRecorder`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     "abc1234".to_string(),
    ///     "192.168.1.1".to_string(),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        code: String,
        ip: String,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            code,
            clicked_at: Utc::now(),
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
        }
    }

    /// Converts the event into the repository input for the click log.
    pub fn to_new_click(&self) -> NewClick {
        NewClick {
            short_code: self.code.clone(),
            clicked_at: self.clicked_at,
            user_agent: self.user_agent.clone(),
            referer: self.referer.clone(),
            source_ip: self.ip.clone(),
        }
    }
}
