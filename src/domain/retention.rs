//! Time-bounded retention of hit events.
//!
//! PostgreSQL has no native TTL eviction, so the policy is enforced in two
//! parts:
//!
//! 1. An expiry index on `hits.date_time`, created concurrently in the
//!    background so it never delays startup.
//! 2. A periodic sweep deleting expired hits in bounded batches. Each batch is
//!    a row-level range delete, so inserts proceed concurrently.
//!
//! Reads apply the same [`RetentionPolicy::cutoff`], so an expired hit is
//! unreachable even before the sweep removes it.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::config::Config;
use crate::domain::repositories::HitRepository;
use crate::error::AppError;

pub const DEFAULT_RETENTION_DAYS: i64 = 7;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_SWEEP_BATCH: i64 = 1000;

/// Retention window and sweep settings for hits.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    window: Duration,
    sweep_interval: StdDuration,
    batch_size: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(
            Duration::days(DEFAULT_RETENTION_DAYS),
            StdDuration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            DEFAULT_SWEEP_BATCH,
        )
    }
}

impl RetentionPolicy {
    pub fn new(window: Duration, sweep_interval: StdDuration, batch_size: i64) -> Self {
        Self {
            window,
            sweep_interval,
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::days(config.hit_retention_days),
            StdDuration::from_secs(config.retention_sweep_interval_secs),
            config.retention_sweep_batch,
        )
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_days(&self) -> i64 {
        self.window.num_days()
    }

    /// Oldest instant still inside the window, exclusive.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// A hit is retained until the full window has elapsed past its timestamp.
    pub fn is_retained(&self, date_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        date_time > self.cutoff(now)
    }

    /// Deletes every hit expired at `now`, batch by batch.
    ///
    /// Returns the total number of evicted hits.
    pub async fn sweep(&self, hits: &dyn HitRepository, now: DateTime<Utc>) -> Result<u64, AppError> {
        let cutoff = self.cutoff(now);
        let mut total = 0u64;

        loop {
            let deleted = hits.delete_older_than(cutoff, self.batch_size).await?;
            total += deleted;

            if deleted < self.batch_size as u64 {
                break;
            }
        }

        if total > 0 {
            metrics::counter!("link_tracker_hits_evicted_total").increment(total);
            tracing::info!(evicted = total, %cutoff, "Evicted expired hits");
        }

        Ok(total)
    }

    /// Installs the policy: ensures the expiry index, then sweeps periodically.
    ///
    /// Runs entirely in the background. Repeated installs across restarts are
    /// harmless: index creation is idempotent and deletes only touch expired rows.
    pub fn install(self, hits: Arc<dyn HitRepository>) -> JoinHandle<()> {
        tokio::spawn(async move {
            match hits.ensure_expiry_index().await {
                Ok(()) => tracing::info!(
                    retention_days = self.window_days(),
                    "Hit expiry index ensured"
                ),
                Err(e) => tracing::warn!(error = %e, "Failed to ensure hit expiry index"),
            }

            let mut ticker = interval(self.sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep(hits.as_ref(), Utc::now()).await {
                    tracing::warn!(error = %e, "Retention sweep failed, retrying next tick");
                }
            }
        })
    }
}
