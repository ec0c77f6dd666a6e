//! Core domain entities.
//!
//! - [`TrackedLink`] - A registered destination and its public identifier
//! - [`Hit`] - One recorded redirect through a tracked link
//!
//! `NewTrackedLink` carries the fields supplied on creation; `created_at` is
//! assigned by the store.

pub mod hit;
pub mod link;

pub use hit::Hit;
pub use link::{NewTrackedLink, TrackedLink};
