//! Short URL creation and listing service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedUrl};
use crate::utils::code_generator::{generate_code, validate_alias};
use crate::utils::url_validator::validate_url;

/// Attempts at finding a free generated code before giving up.
const MAX_ATTEMPTS: usize = 10;

/// A freshly created record together with its public short URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedUrl {
    pub record: UrlRecord,
    pub short_url: String,
}

/// One page of records plus the total record count.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPage {
    pub records: Vec<UrlRecord>,
    pub total: i64,
}

/// Service for creating and listing shortened URLs.
///
/// Resolves a short code (alias or generated), persists the record and primes
/// the cache so that the first redirect is already a hit.
pub struct UrlService {
    url_repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    base_url: String,
    cache_ttl_seconds: u64,
}

impl UrlService {
    /// Creates a new URL service.
    ///
    /// `base_url` is the public origin prepended to short codes; a trailing
    /// slash is ignored.
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            url_repository,
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache_ttl_seconds,
        }
    }

    /// Creates a short URL.
    ///
    /// # Code Resolution
    ///
    /// - With `custom_alias`: validated, checked for availability, used as-is.
    ///   Never retried; if a concurrent request takes it first the insert fails
    ///   with a conflict.
    /// - Without: a random 7-character code, checked against the store and
    ///   regenerated on collision, up to 10 attempts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL or alias.
    /// Returns [`AppError::Conflict`] if the alias is already taken.
    /// Returns [`AppError::Internal`] on database errors or when no free code is found.
    pub async fn shorten(
        &self,
        url: String,
        custom_alias: Option<String>,
    ) -> Result<CreatedUrl, AppError> {
        validate_url(&url)?;

        let record = match custom_alias {
            Some(alias) => self.create_with_alias(url, alias).await?,
            None => self.create_with_generated_code(url).await?,
        };

        let entry = CachedUrl::new(record.original_url.clone(), record.click_count);
        if let Err(e) = self
            .cache
            .set_url(&record.short_code, &entry, Some(self.cache_ttl_seconds))
            .await
        {
            warn!(code = %record.short_code, error = %e, "Failed to prime cache");
        }

        let short_url = self.short_url(&record.short_code);
        Ok(CreatedUrl { record, short_url })
    }

    /// Lists records newest first.
    ///
    /// `page` is 1-based; both arguments are validated by the caller.
    pub async fn list(&self, page: u32, limit: u32) -> Result<UrlPage, AppError> {
        let offset = (i64::from(page) - 1) * i64::from(limit);

        let (records, total) = tokio::try_join!(
            self.url_repository.list(offset, i64::from(limit)),
            self.url_repository.count(),
        )?;

        Ok(UrlPage { records, total })
    }

    /// Checks that the store answers.
    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.url_repository.ping().await
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    async fn create_with_alias(&self, url: String, alias: String) -> Result<UrlRecord, AppError> {
        validate_alias(&alias)?;

        if self.url_repository.find_by_code(&alias).await?.is_some() {
            return Err(alias_taken(&alias));
        }

        let new_record = NewUrlRecord {
            short_code: alias.clone(),
            original_url: url,
        };

        match self.url_repository.create(new_record).await {
            Err(AppError::Conflict { .. }) => Err(alias_taken(&alias)),
            other => other,
        }
    }

    async fn create_with_generated_code(&self, url: String) -> Result<UrlRecord, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let code = generate_code();

            if self.url_repository.find_by_code(&code).await?.is_some() {
                debug!(code, attempt, "Generated code already in use");
                continue;
            }

            let new_record = NewUrlRecord {
                short_code: code.clone(),
                original_url: url.clone(),
            };

            match self.url_repository.create(new_record).await {
                Ok(record) => return Ok(record),
                Err(AppError::Conflict { .. }) => {
                    warn!(code, attempt, "Generated code taken concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_ATTEMPTS }),
        ))
    }
}

fn alias_taken(alias: &str) -> AppError {
    AppError::conflict(
        "This alias is already taken. Please choose another.",
        json!({ "alias": alias }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use chrono::Utc;

    fn record(code: &str, url: &str) -> UrlRecord {
        UrlRecord::new(code.to_string(), url.to_string(), Utc::now(), 0)
    }

    fn quiet_cache() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache.expect_set_url().returning(|_, _, _| Ok(()));
        cache
    }

    fn service(repo: MockUrlRepository, cache: MockCacheService) -> UrlService {
        UrlService::new(Arc::new(repo), Arc::new(cache), "http://localhost:3000/", 86400)
    }

    #[tokio::test]
    async fn test_shorten_generates_seven_char_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .withf(|n| n.short_code.len() == 7 && n.original_url == "https://example.com")
            .times(1)
            .returning(|n| Ok(record(&n.short_code, &n.original_url)));

        let created = service(repo, quiet_cache())
            .shorten("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(created.record.short_code.len(), 7);
        assert_eq!(created.record.original_url, "https://example.com");
        assert_eq!(
            created.short_url,
            format!("http://localhost:3000/{}", created.record.short_code)
        );
    }

    #[tokio::test]
    async fn test_shorten_primes_cache_with_zero_clicks() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|n| Ok(record(&n.short_code, &n.original_url)));

        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .withf(|code, entry, ttl| {
                code == "promo"
                    && entry.original_url == "https://example.com"
                    && entry.click_count == 0
                    && *ttl == Some(86400)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        service(repo, cache)
            .shorten("https://example.com".to_string(), Some("promo".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shorten_ignores_cache_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|n| Ok(record(&n.short_code, &n.original_url)));

        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .returning(|_, _, _| Err(CacheError::ConnectionError("down".to_string())));

        let result = service(repo, cache)
            .shorten("https://example.com".to_string(), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_retries_on_existing_code() {
        let mut repo = MockUrlRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|c| Ok(Some(record(c, "https://other.com"))));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|n| Ok(record(&n.short_code, &n.original_url)));

        let result = service(repo, quiet_cache())
            .shorten("https://example.com".to_string(), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_retries_on_insert_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(2).returning(|_| Ok(None));

        let mut seq = mockall::Sequence::new();
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|n| Ok(record(&n.short_code, &n.original_url)));

        let result = service(repo, quiet_cache())
            .shorten("https://example.com".to_string(), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .times(MAX_ATTEMPTS)
            .returning(|c| Ok(Some(record(c, "https://other.com"))));
        repo.expect_create().times(0);

        let err = service(repo, MockCacheService::new())
            .shorten("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_rejects_bad_protocol() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create().times(0);

        let err = service(repo, MockCacheService::new())
            .shorten("ftp://x".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().starts_with("Invalid URL protocol"));
    }

    #[tokio::test]
    async fn test_shorten_rejects_reserved_alias() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(0);
        repo.expect_create().times(0);

        let err = service(repo, MockCacheService::new())
            .shorten("https://example.com".to_string(), Some("Api".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("reserved"));
    }

    #[tokio::test]
    async fn test_shorten_rejects_taken_alias() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .withf(|c| c == "promo")
            .returning(|c| Ok(Some(record(c, "https://other.com"))));
        repo.expect_create().times(0);

        let err = service(repo, MockCacheService::new())
            .shorten("https://example.com".to_string(), Some("promo".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(
            err.to_string(),
            "This alias is already taken. Please choose another."
        );
    }

    #[tokio::test]
    async fn test_alias_insert_race_becomes_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let err = service(repo, MockCacheService::new())
            .shorten("https://example.com".to_string(), Some("promo".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(err.to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn test_list_computes_offset() {
        let mut repo = MockUrlRepository::new();
        repo.expect_list()
            .withf(|offset, limit| *offset == 20 && *limit == 10)
            .times(1)
            .returning(|_, _| Ok(vec![record("abc1234", "https://example.com")]));
        repo.expect_count().times(1).returning(|| Ok(21));

        let page = service(repo, MockCacheService::new())
            .list(3, 10)
            .await
            .unwrap();

        assert_eq!(page.total, 21);
        assert_eq!(page.records.len(), 1);
    }
}
