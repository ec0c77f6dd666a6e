//! Shared helpers for identifiers and URL checks.

pub mod id_generator;
pub mod url_validation;
