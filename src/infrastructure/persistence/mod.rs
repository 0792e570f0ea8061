//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters and `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - URL record storage, listing and the click counter
//! - [`PgClickRepository`] - Click log and analytics aggregates

pub mod pg_click_repository;
pub mod pg_url_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_url_repository::PgUrlRepository;
