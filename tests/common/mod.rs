#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use external_link_tracker::application::services::LinkRegistry;
use external_link_tracker::domain::entities::{Hit, NewTrackedLink, TrackedLink};
use external_link_tracker::domain::repositories::{HitRepository, LinkRepository};
use external_link_tracker::domain::retention::RetentionPolicy;
use external_link_tracker::error::AppError;
use external_link_tracker::infrastructure::store::StoreProbe;
use external_link_tracker::state::AppState;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "http://track.test";

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, TrackedLink>>,
}

impl InMemoryLinkRepository {
    pub fn insert(&self, id: &str, url: &str) {
        let link = TrackedLink::new(id.to_string(), url.to_string(), Utc::now());
        self.links.lock().unwrap().insert(id.to_string(), link);
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewTrackedLink) -> Result<TrackedLink, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.id) {
            return Err(AppError::conflict("Identifier taken", json!({})));
        }
        let link = TrackedLink::new(new_link.id.clone(), new_link.destination_url, Utc::now());
        links.insert(new_link.id, link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TrackedLink>, AppError> {
        Ok(self.links.lock().unwrap().get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryHitRepository {
    hits: Mutex<Vec<Hit>>,
}

impl InMemoryHitRepository {
    pub fn push(&self, hit: Hit) {
        self.hits.lock().unwrap().push(hit);
    }

    pub fn all(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }
}

#[async_trait]
impl HitRepository for InMemoryHitRepository {
    async fn record(&self, hit: Hit) -> Result<(), AppError> {
        self.push(hit);
        Ok(())
    }

    async fn list_since(&self, link_id: &str, since: DateTime<Utc>) -> Result<Vec<Hit>, AppError> {
        let mut hits: Vec<Hit> = self
            .hits
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.link_id == link_id && h.date_time > since)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        Ok(hits)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<u64, AppError> {
        let mut hits = self.hits.lock().unwrap();
        let mut removed = 0u64;
        hits.retain(|h| {
            if h.date_time <= cutoff && (removed as i64) < limit {
                removed += 1;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn ensure_expiry_index(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Hit store that rejects every write.
pub struct FailingHitRepository;

#[async_trait]
impl HitRepository for FailingHitRepository {
    async fn record(&self, _hit: Hit) -> Result<(), AppError> {
        Err(AppError::store_unavailable("Store unavailable", json!({})))
    }

    async fn list_since(&self, _link_id: &str, _since: DateTime<Utc>) -> Result<Vec<Hit>, AppError> {
        Err(AppError::store_unavailable("Store unavailable", json!({})))
    }

    async fn delete_older_than(&self, _cutoff: DateTime<Utc>, _limit: i64) -> Result<u64, AppError> {
        Err(AppError::store_unavailable("Store unavailable", json!({})))
    }

    async fn ensure_expiry_index(&self) -> Result<(), AppError> {
        Err(AppError::store_unavailable("Store unavailable", json!({})))
    }
}

/// Store probe with a fixed answer.
pub enum StaticProbe {
    Healthy,
    Failing,
    Hanging,
}

#[async_trait]
impl StoreProbe for StaticProbe {
    async fn ping(&self) -> Result<(), AppError> {
        match self {
            StaticProbe::Healthy => Ok(()),
            StaticProbe::Failing => Err(AppError::store_unavailable(
                "Store unavailable",
                json!({ "reason": "connection refused" }),
            )),
            StaticProbe::Hanging => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }
    }
}

pub struct TestContext {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub hits: Arc<InMemoryHitRepository>,
    pub hit_rx: mpsc::Receiver<Hit>,
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(StaticProbe::Healthy, 100)
}

pub fn create_test_context_with(probe: StaticProbe, queue_capacity: usize) -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::default());
    let hits = Arc::new(InMemoryHitRepository::default());
    let (tx, rx) = mpsc::channel(queue_capacity);

    let registry = Arc::new(LinkRegistry::new(
        links.clone(),
        hits.clone(),
        tx,
        RetentionPolicy::default(),
    ));
    let state = AppState::new(
        registry,
        Arc::new(probe),
        TEST_BASE_URL,
        Duration::from_millis(200),
    );

    TestContext {
        state,
        links,
        hits,
        hit_rx: rx,
    }
}

/// Drains every hit currently queued without blocking.
pub fn drain_hits(rx: &mut mpsc::Receiver<Hit>) -> Vec<Hit> {
    let mut hits = Vec::new();
    while let Ok(hit) = rx.try_recv() {
        hits.push(hit);
    }
    hits
}
