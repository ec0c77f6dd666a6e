//! HTTP middleware shared by both listeners.

pub mod tracing;
