//! HTTP layer for both listeners.
//!
//! This layer translates HTTP requests into registry operations and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Per-listener route tables

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
