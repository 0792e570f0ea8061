//! In-process cache backed by `moka`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use tracing::debug;

use super::service::{CacheResult, CacheService, CachedUrl, cache_key};

/// Upper bound on entries kept by default.
pub const DEFAULT_MAX_CAPACITY: u64 = 100_000;

#[derive(Clone)]
struct Entry {
    value: CachedUrl,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache living inside the service process.
///
/// Suited to single-instance deployments without Redis. Entries are lost on
/// restart, which is harmless since the cache is never authoritative.
pub struct MemoryCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl_seconds: u64, max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(
            "MemoryCache initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl_seconds
        );

        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<CachedUrl>> {
        Ok(self
            .inner
            .get(&cache_key(short_code))
            .await
            .map(|entry| entry.value))
    }

    async fn set_url(
        &self,
        short_code: &str,
        entry: &CachedUrl,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        self.inner
            .insert(
                cache_key(short_code),
                Entry {
                    value: entry.clone(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.inner.invalidate(&cache_key(short_code)).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
