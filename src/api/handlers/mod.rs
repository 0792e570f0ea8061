//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod redirect;
pub mod urls;

pub use analytics::{analytics_overview_handler, code_analytics_handler};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use urls::{create_url_handler, get_url_handler, list_urls_handler};
