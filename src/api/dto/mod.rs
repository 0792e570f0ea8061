//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON with camelCase field names, and validator for
//! request bodies. Timestamps are rendered as ISO-8601 with millisecond precision.

pub mod analytics;
pub mod health;
pub mod pagination;
pub mod urls;

/// Serde helpers rendering `DateTime<Utc>` as `2025-01-01T12:00:00.000Z`.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::Serializer;

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}
