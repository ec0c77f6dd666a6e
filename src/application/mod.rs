//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose the operations HTTP handlers
//! call.
//!
//! - [`services::link_registry::LinkRegistry`] - Link creation, lookup and hit recording

pub mod services;
