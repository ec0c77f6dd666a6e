//! Shared state injected into handlers of both listeners.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::LinkRegistry;
use crate::infrastructure::store::StoreProbe;

/// Read-only state shared by all requests.
///
/// Cloning is cheap: every field is reference-counted or small.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LinkRegistry>,
    pub store: Arc<dyn StoreProbe>,
    pub public_base_url: Arc<str>,
    pub healthcheck_timeout: Duration,
}

impl AppState {
    pub fn new(
        registry: Arc<LinkRegistry>,
        store: Arc<dyn StoreProbe>,
        public_base_url: impl Into<Arc<str>>,
        healthcheck_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            public_base_url: public_base_url.into(),
            healthcheck_timeout,
        }
    }
}
