//! Click recorder: appends click events and advances the click counter.
//!
//! Every failure is logged here and swallowed. Callers never see an error from
//! analytics, so a broken click log can never take the redirect path down.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, UrlRepository};

/// Base delay of the background retry backoff, in milliseconds.
const RETRY_BASE_MILLIS: u64 = 10;

/// Retries after the first failed attempt in the background path.
const MAX_RETRIES: usize = 3;

/// Persists click events against the store.
///
/// Two independent store calls are made per event: the atomic counter-add on the
/// URL record and the append to the click log. No transaction spans them.
pub struct ClickRecorder {
    url_repository: Arc<dyn UrlRepository>,
    click_repository: Arc<dyn ClickRepository>,
}

impl ClickRecorder {
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        click_repository: Arc<dyn ClickRepository>,
    ) -> Self {
        Self {
            url_repository,
            click_repository,
        }
    }

    /// Records a click with a single attempt per store call.
    ///
    /// Used inline on the redirect cache-miss path. Returns the click count after
    /// the increment, or `None` if the increment failed or the code is unknown.
    pub async fn record(&self, event: &ClickEvent) -> Option<i64> {
        let count = match self.url_repository.increment_clicks(&event.code).await {
            Ok(Some(count)) => Some(count),
            Ok(None) => {
                warn!(code = %event.code, "Click for unknown short code dropped");
                return None;
            }
            Err(e) => {
                warn!(code = %event.code, error = %e, "Failed to increment click counter");
                None
            }
        };

        if let Err(e) = self.click_repository.record_click(event.to_new_click()).await {
            warn!(code = %event.code, error = %e, "Failed to append click event");
        }

        count
    }

    /// Records a click for the background worker.
    ///
    /// The counter increment is attempted exactly once: an error may arrive after
    /// the add committed, and a second attempt would count the click twice. Only
    /// the click log append is retried, with jittered exponential backoff.
    pub async fn record_with_retry(&self, event: &ClickEvent) {
        let code = event.code.as_str();

        match self.url_repository.increment_clicks(code).await {
            Ok(Some(count)) => debug!(code, count, "Click counter incremented"),
            Ok(None) => {
                warn!(code, "Click for unknown short code dropped");
                return;
            }
            Err(e) => error!(code, error = %e, "Click counter increment failed"),
        }

        let new_click = event.to_new_click();
        if let Err(e) = Retry::spawn(backoff(), || {
            self.click_repository.record_click(new_click.clone())
        })
        .await
        {
            error!(code, error = %e, "Giving up on click event append");
        }
    }
}

fn backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_BASE_MILLIS)
        .map(jitter)
        .take(MAX_RETRIES)
}
