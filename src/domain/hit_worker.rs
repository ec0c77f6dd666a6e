//! Background writer for hit events.
//!
//! Redirect handlers enqueue hits onto a bounded channel and return
//! immediately; this worker drains the channel and writes each hit with
//! bounded concurrency. A failed write is logged and counted, never retried:
//! every enqueued hit produces at most one stored record.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Semaphore, mpsc};

use crate::domain::entities::Hit;
use crate::domain::repositories::HitRepository;

/// Runs until every sender is dropped, then waits for in-flight writes.
pub async fn run_hit_worker(
    mut rx: mpsc::Receiver<Hit>,
    hits: Arc<dyn HitRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(hit) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let hits = hits.clone();

        tokio::spawn(async move {
            let hit = hit.clamped_to(Utc::now());
            let link_id = hit.link_id.clone();

            match hits.record(hit).await {
                Ok(()) => {
                    metrics::counter!("link_tracker_hits_recorded_total").increment(1);
                }
                Err(e) => {
                    metrics::counter!("link_tracker_hits_failed_total").increment(1);
                    tracing::warn!(link_id = %link_id, error = %e, "Failed to record hit");
                }
            }

            drop(permit);
        });
    }

    let _ = permits.acquire_many(concurrency as u32).await;
    tracing::info!("Hit worker stopped");
}
