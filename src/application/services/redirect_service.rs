//! Cache-aside resolution of short codes.
//!
//! Read path: cache, then store on a miss, then repopulate the cache. A cache
//! error is indistinguishable from a miss to callers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedUrl};

/// Where a lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Database,
}

impl LookupSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Cache => "cache",
            LookupSource::Database => "database",
        }
    }
}

/// Result of resolving a short code.
///
/// `created_at` is only known when the store was consulted; cache entries do
/// not carry it. `click_count` from the cache is a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUrl {
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub source: LookupSource,
}

impl ResolvedUrl {
    fn from_cache(code: &str, entry: CachedUrl) -> Self {
        Self {
            short_code: code.to_string(),
            original_url: entry.original_url,
            click_count: entry.click_count,
            created_at: None,
            source: LookupSource::Cache,
        }
    }

    fn from_record(record: UrlRecord) -> Self {
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
            click_count: record.click_count,
            created_at: Some(record.created_at),
            source: LookupSource::Database,
        }
    }
}

/// Redirect resolver.
///
/// # Redirect flow
///
/// - **Hit**: the click event is queued for the background worker with
///   `try_send` and the URL returned at once. A full queue drops the event.
/// - **Miss**: the record is read from the store, the click is recorded inline
///   (single attempt, failures swallowed), and the cache is refreshed in a
///   detached task so the response never waits on it.
pub struct RedirectService {
    url_repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    recorder: Arc<ClickRecorder>,
    click_sender: mpsc::Sender<ClickEvent>,
    cache_ttl_seconds: u64,
}

impl RedirectService {
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        recorder: Arc<ClickRecorder>,
        click_sender: mpsc::Sender<ClickEvent>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            url_repository,
            cache,
            recorder,
            click_sender,
            cache_ttl_seconds,
        }
    }

    /// Resolves `event.code` for a redirect and records the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if neither the cache nor the store knows the code.
    /// Returns [`AppError::Internal`] if the store lookup fails.
    pub async fn resolve(&self, event: ClickEvent) -> Result<String, AppError> {
        let code = event.code.clone();

        if let Some(entry) = self.cached(&code).await {
            self.enqueue_click(event);
            return Ok(entry.original_url);
        }

        let record = self.find_record(&code).await?;

        let click_count = self
            .recorder
            .record(&event)
            .await
            .unwrap_or(record.click_count);

        self.refresh_cache_detached(
            code,
            CachedUrl::new(record.original_url.clone(), click_count),
        );

        Ok(record.original_url)
    }

    /// Looks a code up without recording a click.
    ///
    /// Populates the cache on a miss, like the redirect path.
    pub async fn lookup(&self, code: &str) -> Result<ResolvedUrl, AppError> {
        if let Some(entry) = self.cached(code).await {
            return Ok(ResolvedUrl::from_cache(code, entry));
        }

        let record = self.find_record(code).await?;

        let entry = CachedUrl::new(record.original_url.clone(), record.click_count);
        if let Err(e) = self
            .cache
            .set_url(code, &entry, Some(self.cache_ttl_seconds))
            .await
        {
            warn!(code, error = %e, "Failed to populate cache");
        }

        Ok(ResolvedUrl::from_record(record))
    }

    async fn cached(&self, code: &str) -> Option<CachedUrl> {
        match self.cache.get_url(code).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(code, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn find_record(&self, code: &str) -> Result<UrlRecord, AppError> {
        self.url_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))
    }

    fn enqueue_click(&self, event: ClickEvent) {
        match self.click_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(code = %event.code, "Click queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(code = %event.code, "Click queue closed, dropping event");
            }
        }
    }

    fn refresh_cache_detached(&self, code: String, entry: CachedUrl) {
        let cache = self.cache.clone();
        let ttl = self.cache_ttl_seconds;

        tokio::spawn(async move {
            match cache.set_url(&code, &entry, Some(ttl)).await {
                Ok(()) => debug!(code, "Cache repopulated"),
                Err(e) => warn!(code, error = %e, "Failed to repopulate cache"),
            }
        });
    }
}
