//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits on top of
//! [`crate::infrastructure::store::StorePool`], using runtime-bound SQLx
//! queries.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgHitRepository`] - Hit recording, listing and expiry

pub mod pg_hit_repository;
pub mod pg_link_repository;

pub use pg_hit_repository::PgHitRepository;
pub use pg_link_repository::PgLinkRepository;
