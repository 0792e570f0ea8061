#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo, middleware, routing::get};
use chrono::{DateTime, Utc};
use serde_json::json;
use shortly::api;
use shortly::api::handlers::{health_handler, redirect_handler};
use shortly::api::middleware::rate_limit;
use shortly::domain::click_event::ClickEvent;
use shortly::domain::click_recorder::ClickRecorder;
use shortly::domain::entities::{
    Click, DailyCount, NewClick, NewUrlRecord, UrlRecord, UserAgentCount,
};
use shortly::domain::repositories::{ClickRepository, UrlRepository};
use shortly::error::AppError;
use shortly::infrastructure::cache::{
    CacheError, CacheResult, CacheService, CachedUrl, MemoryCache, NullCache,
};
use shortly::state::{AppState, StateSettings};
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://localhost:3000";

// ---------------------------------------------------------------------------
// In-memory repositories
// ---------------------------------------------------------------------------

/// URL store keeping insertion order for "newest first" listings.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: Mutex<Vec<UrlRecord>>,
    pub fail: Mutex<bool>,
}

impl InMemoryUrlRepository {
    pub fn insert(&self, code: &str, url: &str) {
        self.records.lock().unwrap().push(UrlRecord::new(
            code.to_string(),
            url.to_string(),
            Utc::now(),
            0,
        ));
    }

    pub fn get(&self, code: &str) -> Option<UrlRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.short_code == code)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.short_code == new_record.short_code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_pkey" }),
            ));
        }
        let record = UrlRecord::new(new_record.short_code, new_record.original_url, Utc::now(), 0);
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        self.check()?;
        Ok(self.get(code))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<UrlRecord>, AppError> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.len() as i64)
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<i64>, AppError> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter_mut()
            .find(|r| r.short_code == code)
            .map(|r| {
                r.click_count += 1;
                r.click_count
            }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

#[derive(Default)]
pub struct InMemoryClickRepository {
    clicks: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    pub fn all(&self) -> Vec<Click> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn push_at(&self, code: &str, at: DateTime<Utc>, user_agent: Option<&str>) {
        let mut clicks = self.clicks.lock().unwrap();
        let id = clicks.len() as i64 + 1;
        clicks.push(Click::new(
            id,
            code.to_string(),
            at,
            user_agent.map(str::to_string),
            None,
            "10.0.0.1".to_string(),
        ));
    }

    fn for_code(&self, code: &str) -> Vec<Click> {
        self.clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.short_code == code)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut clicks = self.clicks.lock().unwrap();
        let click = Click::new(
            clicks.len() as i64 + 1,
            new_click.short_code,
            new_click.clicked_at,
            new_click.user_agent,
            new_click.referer,
            new_click.source_ip,
        );
        clicks.push(click.clone());
        Ok(click)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.clicks.lock().unwrap().len() as i64)
    }

    async fn count_since(&self, code: &str, since: DateTime<Utc>) -> Result<i64, AppError> {
        Ok(self
            .for_code(code)
            .iter()
            .filter(|c| c.clicked_at >= since)
            .count() as i64)
    }

    async fn top_user_agents(
        &self,
        code: &str,
        limit: i64,
    ) -> Result<Vec<UserAgentCount>, AppError> {
        let mut counts: HashMap<Option<String>, i64> = HashMap::new();
        for click in self.for_code(code) {
            *counts.entry(click.user_agent).or_default() += 1;
        }
        let mut rows: Vec<UserAgentCount> = counts
            .into_iter()
            .map(|(user_agent, count)| UserAgentCount { user_agent, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.user_agent.cmp(&b.user_agent)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn clicks_by_date(
        &self,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for click in self.for_code(code) {
            if click.clicked_at >= since {
                *counts
                    .entry(click.clicked_at.format("%Y-%m-%d").to_string())
                    .or_default() += 1;
            }
        }
        let mut rows: Vec<DailyCount> = counts
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rows)
    }

    async fn recent(&self, code: &str, limit: i64) -> Result<Vec<Click>, AppError> {
        let mut clicks = self.for_code(code);
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));
        clicks.truncate(limit as usize);
        Ok(clicks)
    }
}

// ---------------------------------------------------------------------------
// Caches
// ---------------------------------------------------------------------------

/// A cache whose backend is always down.
pub struct UnreachableCache;

#[async_trait]
impl CacheService for UnreachableCache {
    async fn get_url(&self, _short_code: &str) -> CacheResult<Option<CachedUrl>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set_url(
        &self,
        _short_code: &str,
        _entry: &CachedUrl,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

pub fn memory_cache() -> Arc<MemoryCache> {
    Arc::new(MemoryCache::new(86_400, 1_000))
}

pub fn null_cache() -> Arc<NullCache> {
    Arc::new(NullCache::new())
}

// ---------------------------------------------------------------------------
// Application wiring
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub state: AppState,
    pub urls: Arc<InMemoryUrlRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
    pub recorder: Arc<ClickRecorder>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

impl TestApp {
    pub fn new(cache: Arc<dyn CacheService>) -> Self {
        Self::with_queue_capacity(cache, 100)
    }

    pub fn with_queue_capacity(cache: Arc<dyn CacheService>, capacity: usize) -> Self {
        let urls = Arc::new(InMemoryUrlRepository::default());
        let clicks = Arc::new(InMemoryClickRepository::default());
        let recorder = Arc::new(ClickRecorder::new(urls.clone(), clicks.clone()));
        let (tx, click_rx) = mpsc::channel(capacity);

        let state = AppState::new(
            urls.clone(),
            clicks.clone(),
            cache,
            tx,
            recorder.clone(),
            StateSettings {
                base_url: BASE_URL.to_string(),
                cache_ttl_seconds: 86_400,
            },
        );

        Self {
            state,
            urls,
            clicks,
            recorder,
            click_rx,
        }
    }

    pub fn router(&self) -> Router {
        test_router(self.state.clone())
    }
}

/// All routes without rate limiting, with a fixed peer address.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .route("/{code}", get(redirect_handler))
        .layer(middleware::map_response(rate_limit::json_rejection))
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    use shortly::infrastructure::persistence::{PgClickRepository, PgUrlRepository};

    let pool = Arc::new(pool);
    let urls = Arc::new(PgUrlRepository::new(pool.clone()));
    let clicks = Arc::new(PgClickRepository::new(pool));
    let recorder = Arc::new(ClickRecorder::new(urls.clone(), clicks.clone()));
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        urls,
        clicks,
        null_cache(),
        tx,
        recorder,
        StateSettings {
            base_url: BASE_URL.to_string(),
            cache_ttl_seconds: 86_400,
        },
    );

    (state, rx)
}

/// Polls `check` until it holds or a second has passed.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

// ---------------------------------------------------------------------------
// ConnectInfo injection
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
