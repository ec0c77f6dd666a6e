//! HTTP request handlers for both listeners.
//!
//! Public: [`redirect`]. Private: [`register`], [`hits`], [`health`].

pub mod health;
pub mod hits;
pub mod redirect;
pub mod register;

pub use health::health_handler;
pub use hits::hits_handler;
pub use redirect::{redirect_handler, redirect_path_handler};
pub use register::register_handler;
