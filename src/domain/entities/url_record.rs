//! URL record entity: the persisted mapping from a short code to its destination.

use chrono::{DateTime, Utc};

/// A shortened URL as stored in the persistent store.
///
/// `short_code` is globally unique. `click_count` only ever grows; it is mutated
/// by the click recorder through an atomic counter-add in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl UrlRecord {
    pub fn new(
        short_code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            short_code,
            original_url,
            created_at,
            click_count,
        }
    }
}

/// Input data for creating a URL record.
///
/// New records always start with `click_count = 0`; `created_at` is assigned
/// by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub short_code: String,
    pub original_url: String,
}
