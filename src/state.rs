//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, RedirectService, UrlService};
use crate::domain::click_event::ClickEvent;
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::repositories::{ClickRepository, UrlRepository};
use crate::infrastructure::cache::CacheService;

/// Services and handles shared across requests.
///
/// Cloned per request by Axum; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub redirect_service: Arc<RedirectService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub started_at: Instant,
}

/// Knobs needed to wire the services together.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub base_url: String,
    pub cache_ttl_seconds: u64,
}

impl AppState {
    /// Wires services over the given repositories and cache.
    ///
    /// `click_sender` is the producer side of the queue drained by
    /// [`crate::domain::click_worker::run_click_worker`].
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        click_repository: Arc<dyn ClickRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        recorder: Arc<ClickRecorder>,
        settings: StateSettings,
    ) -> Self {
        let url_service = Arc::new(UrlService::new(
            url_repository.clone(),
            cache.clone(),
            settings.base_url,
            settings.cache_ttl_seconds,
        ));

        let redirect_service = Arc::new(RedirectService::new(
            url_repository.clone(),
            cache.clone(),
            recorder,
            click_sender.clone(),
            settings.cache_ttl_seconds,
        ));

        let analytics_service = Arc::new(AnalyticsService::new(url_repository, click_repository));

        Self {
            url_service,
            redirect_service,
            analytics_service,
            cache,
            click_sender,
            started_at: Instant::now(),
        }
    }
}
