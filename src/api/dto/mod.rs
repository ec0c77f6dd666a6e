//! Request and response DTOs for API endpoints.

pub mod health;
pub mod hits;
pub mod register;
