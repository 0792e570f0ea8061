//! Business logic services for the application layer.

pub mod analytics_service;
pub mod redirect_service;
pub mod url_service;

pub use analytics_service::{AnalyticsService, ClickWindows, CodeAnalytics, Overview};
pub use redirect_service::{LookupSource, RedirectService, ResolvedUrl};
pub use url_service::{CreatedUrl, UrlPage, UrlService};
