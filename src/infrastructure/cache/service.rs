//! Cache service trait, cached value and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Namespace prefix of cache keys: `url:<shortCode>`.
pub const KEY_PREFIX: &str = "url:";

/// Builds the cache key for a short code.
pub fn cache_key(short_code: &str) -> String {
    format!("{}{}", KEY_PREFIX, short_code)
}

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),

    #[error("Cache serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Value stored under `url:<shortCode>`.
///
/// Serialized as `{"originalUrl": "...", "clicks": 0}`. The click count is a
/// snapshot taken when the entry was written and goes stale within the TTL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedUrl {
    #[serde(rename = "originalUrl")]
    pub original_url: String,
    #[serde(rename = "clicks")]
    pub click_count: i64,
}

impl CachedUrl {
    pub fn new(original_url: impl Into<String>, click_count: i64) -> Self {
        Self {
            original_url: original_url.into(),
            click_count,
        }
    }
}

/// Trait for caching short code mappings.
///
/// The cache is never authoritative. Callers treat `Err` exactly like a miss and
/// fall back to the persistent store; write failures are logged and dropped.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache for single-node setups
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the cached mapping for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` on cache hit
    /// - `Ok(None)` on cache miss or expired entry
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<CachedUrl>>;

    /// Stores a mapping with an optional TTL in seconds.
    ///
    /// `None` uses the implementation's configured default.
    async fn set_url(
        &self,
        short_code: &str,
        entry: &CachedUrl,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached mapping.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for health output and logs.
    fn backend_name(&self) -> &'static str;
}
