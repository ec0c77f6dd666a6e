//! Tracked link registration, lookup and hit recording.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::entities::{Hit, NewTrackedLink, TrackedLink};
use crate::domain::repositories::{HitRepository, LinkRepository};
use crate::domain::retention::RetentionPolicy;
use crate::error::AppError;
use crate::utils::id_generator::{generate_id, is_well_formed_id};
use crate::utils::url_validation::validate_destination_url;

/// Attempts at finding an unused identifier before giving up.
const MAX_ID_ATTEMPTS: usize = 10;

/// Service owning the lifecycle of tracked links and their hits.
///
/// Hits are not written here: [`LinkRegistry::record_hit`] only enqueues them
/// for [`crate::domain::hit_worker::run_hit_worker`], so a slow or failing
/// store never delays a redirect.
pub struct LinkRegistry {
    links: Arc<dyn LinkRepository>,
    hits: Arc<dyn HitRepository>,
    hit_sender: mpsc::Sender<Hit>,
    retention: RetentionPolicy,
}

impl LinkRegistry {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        hits: Arc<dyn HitRepository>,
        hit_sender: mpsc::Sender<Hit>,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            links,
            hits,
            hit_sender,
            retention,
        }
    }

    /// Registers a new destination.
    ///
    /// The URL is stored exactly as given (minus surrounding whitespace) so the
    /// redirect target matches the registration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty, malformed, not
    /// http/https or has no host. Nothing is persisted in that case.
    /// Returns [`AppError::StoreUnavailable`] if the write fails.
    /// Returns [`AppError::Internal`] if no free identifier is found.
    pub async fn create(&self, destination_url: &str) -> Result<TrackedLink, AppError> {
        let destination_url = destination_url.trim();

        validate_destination_url(destination_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "url": destination_url }))
        })?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let new_link = NewTrackedLink {
                id: generate_id()?,
                destination_url: destination_url.to_string(),
            };

            match self.links.create(new_link).await {
                Ok(link) => {
                    tracing::info!(
                        id = %link.id,
                        url = %link.destination_url,
                        "Registered tracked link"
                    );
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Identifier collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique identifier",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Resolves an identifier.
    ///
    /// Identifiers the registry could never have issued are rejected without
    /// a store round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown identifiers. This is an
    /// ordinary outcome for stale or mistyped links.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn lookup(&self, id: &str) -> Result<TrackedLink, AppError> {
        if !is_well_formed_id(id) {
            return Err(not_found(id));
        }

        self.links.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Queues a hit for background persistence.
    ///
    /// Never fails the caller: a full or closed queue is logged and the hit is
    /// dropped. Returns whether the hit was queued.
    pub fn record_hit(&self, link_id: &str, timestamp: DateTime<Utc>) -> bool {
        match self.hit_sender.try_send(Hit::new(link_id, timestamp)) {
            Ok(()) => true,
            Err(TrySendError::Full(hit)) => {
                metrics::counter!("link_tracker_hits_dropped_total").increment(1);
                tracing::warn!(link_id = %hit.link_id, "Hit queue full, dropping hit");
                false
            }
            Err(TrySendError::Closed(hit)) => {
                metrics::counter!("link_tracker_hits_dropped_total").increment(1);
                tracing::error!(link_id = %hit.link_id, "Hit queue closed, dropping hit");
                false
            }
        }
    }

    /// Retained hits of a known link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is unknown.
    pub async fn hits_for(&self, id: &str) -> Result<Vec<Hit>, AppError> {
        self.hits_as_of(id, Utc::now()).await
    }

    /// Same as [`Self::hits_for`] evaluated at an explicit instant.
    pub async fn hits_as_of(&self, id: &str, now: DateTime<Utc>) -> Result<Vec<Hit>, AppError> {
        let link = self.lookup(id).await?;
        let cutoff = self.retention.cutoff(now);

        let mut hits = self.hits.list_since(&link.id, cutoff).await?;
        hits.retain(|hit| self.retention.is_retained(hit.date_time, now));

        Ok(hits)
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Whether the hit worker is still accepting events.
    pub fn hit_queue_open(&self) -> bool {
        !self.hit_sender.is_closed()
    }

    /// Free slots left in the hit queue.
    pub fn hit_queue_capacity(&self) -> usize {
        self.hit_sender.capacity()
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found("Tracked link not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockHitRepository, MockLinkRepository};
    use chrono::Duration;
    use mockall::Sequence;

    fn registry(
        links: MockLinkRepository,
        hits: MockHitRepository,
        capacity: usize,
    ) -> (LinkRegistry, mpsc::Receiver<Hit>) {
        let (tx, rx) = mpsc::channel(capacity);
        let registry = LinkRegistry::new(
            Arc::new(links),
            Arc::new(hits),
            tx,
            RetentionPolicy::default(),
        );
        (registry, rx)
    }

    fn stored(new_link: NewTrackedLink) -> TrackedLink {
        TrackedLink::new(new_link.id, new_link.destination_url, Utc::now())
    }

    #[tokio::test]
    async fn test_create_persists_exact_url() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .withf(|new_link| {
                new_link.destination_url == "https://example.com/page?a=1#frag"
                    && new_link.id.len() == 12
            })
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        let link = registry
            .create("  https://example.com/page?a=1#frag ")
            .await
            .unwrap();
        assert_eq!(link.destination_url, "https://example.com/page?a=1#frag");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url_without_writing() {
        let mut links = MockLinkRepository::new();
        links.expect_create().times(0);

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        for input in ["", "   ", "not-a-url", "ftp://example.com"] {
            let result = registry.create(input).await;
            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_retries_on_id_collision() {
        let mut seq = Sequence::new();
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));
        links
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(stored(new_link)));

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        assert!(registry.create("https://example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_gives_up_after_repeated_collisions() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .times(MAX_ID_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        let result = registry.create("https://example.com").await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_create_surfaces_store_failure() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("down", json!({}))));

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        let result = registry.create("https://example.com").await;
        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .withf(|id| id == "doesnotexist")
            .times(1)
            .returning(|_| Ok(None));

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        let result = registry.lookup("doesnotexist").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_lookup_malformed_id_skips_store() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().times(0);

        let (registry, _rx) = registry(links, MockHitRepository::new(), 10);

        let result = registry.lookup("../etc/passwd").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_record_hit_enqueues() {
        let (registry, mut rx) = registry(MockLinkRepository::new(), MockHitRepository::new(), 10);

        let now = Utc::now();
        assert!(registry.record_hit("abc123", now));

        let hit = rx.try_recv().unwrap();
        assert_eq!(hit, Hit::new("abc123", now));
    }

    #[tokio::test]
    async fn test_record_hit_drops_when_full() {
        let (registry, _rx) = registry(MockLinkRepository::new(), MockHitRepository::new(), 1);

        assert!(registry.record_hit("abc123", Utc::now()));
        assert!(!registry.record_hit("abc123", Utc::now()));
    }

    #[tokio::test]
    async fn test_record_hit_drops_when_closed() {
        let (registry, rx) = registry(MockLinkRepository::new(), MockHitRepository::new(), 1);
        drop(rx);

        assert!(!registry.record_hit("abc123", Utc::now()));
        assert!(!registry.hit_queue_open());
    }

    #[tokio::test]
    async fn test_hits_as_of_filters_expired() {
        let now = Utc::now();

        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().returning(|id| {
            Ok(Some(TrackedLink::new(
                id.to_string(),
                "https://example.com".to_string(),
                Utc::now(),
            )))
        });

        let mut hits = MockHitRepository::new();
        hits.expect_list_since()
            .withf(move |link_id, since| link_id == "abc123" && *since == now - Duration::days(7))
            .times(1)
            .returning(move |_, _| {
                Ok(vec![
                    Hit::new("abc123", now - Duration::hours(1)),
                    Hit::new("abc123", now - Duration::days(7)),
                ])
            });

        let (registry, _rx) = registry(links, hits, 10);

        let retained = registry.hits_as_of("abc123", now).await.unwrap();
        assert_eq!(retained, vec![Hit::new("abc123", now - Duration::hours(1))]);
    }
}
