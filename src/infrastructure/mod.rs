//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`store`] - Root store pool, per-request sessions and reachability probe
//! - [`persistence`] - PostgreSQL repository implementations

pub mod persistence;
pub mod store;
