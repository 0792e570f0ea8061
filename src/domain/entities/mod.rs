//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - A short code mapped to its destination URL
//! - [`Click`] - A redirect event on a short code
//!
//! Creation inputs use separate structs (`NewUrlRecord`, `NewClick`) so that
//! store-assigned fields never have to be invented by callers.

pub mod click;
pub mod url_record;

pub use click::{Click, DailyCount, NewClick, UserAgentCount};
pub use url_record::{NewUrlRecord, UrlRecord};
