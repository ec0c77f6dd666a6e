//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`hit_worker`] - Asynchronous hit writer
//! - [`retention`] - Hit retention window and eviction sweep
//!
//! # Hit Processing Flow
//!
//! 1. The redirect handler resolves a link and answers with a redirect
//! 2. A [`entities::Hit`] is pushed onto a bounded channel (non-blocking)
//! 3. [`hit_worker::run_hit_worker`] persists it via [`repositories::HitRepository`]
//! 4. [`retention::RetentionPolicy`] evicts it once the window has elapsed

pub mod entities;
pub mod hit_worker;
pub mod repositories;
pub mod retention;
