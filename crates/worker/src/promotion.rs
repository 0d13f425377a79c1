//! Daily launch promotion.
//!
//! [`PromotionJob`] runs on a fixed interval. Each pass computes today's UTC
//! date and hands it to [`LaunchRepo::promote`], which in one transaction
//! finishes and ranks the launches of past days and starts the launches due
//! today. Passes are idempotent, so the interval only bounds how late a day
//! can start.

use std::time::Duration;

use openlaunch_core::types::{today_utc, LaunchDate};
use openlaunch_db::models::launch::PromotionSummary;
use openlaunch_db::repositories::LaunchRepo;
use openlaunch_db::DbPool;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Default time between promotion passes: 5 minutes.
pub const DEFAULT_PROMOTION_INTERVAL: Duration = Duration::from_secs(300);

/// Background service that promotes launches on a periodic basis.
pub struct PromotionJob {
    pool: DbPool,
    interval: Duration,
}

impl PromotionJob {
    /// Create a job with the given pool and tick interval.
    pub fn new(pool: DbPool, interval: Duration) -> Self {
        Self { pool, interval }
    }

    /// Read the interval from `PROMOTION_INTERVAL_SECS`, falling back to
    /// [`DEFAULT_PROMOTION_INTERVAL`] when unset.
    ///
    /// # Panics
    ///
    /// Panics if the variable is set but is not a positive integer.
    pub fn interval_from_env() -> Duration {
        match std::env::var("PROMOTION_INTERVAL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .expect("PROMOTION_INTERVAL_SECS must be a positive integer");
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_PROMOTION_INTERVAL,
        }
    }

    /// Run one promotion pass for `today`.
    pub async fn run_once(&self, today: LaunchDate) -> Result<PromotionSummary, sqlx::Error> {
        let summary = LaunchRepo::promote(&self.pool, today).await?;
        if summary == PromotionSummary::default() {
            tracing::debug!(%today, "Promotion: nothing to do");
        } else {
            tracing::info!(
                %today,
                started = summary.started,
                launched = summary.launched,
                ranked = summary.ranked,
                "Promotion: launches advanced"
            );
        }
        Ok(summary)
    }

    /// Run the promotion loop until `cancel` is triggered.
    ///
    /// The first pass runs immediately so a restarted worker catches up
    /// without waiting a full interval.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Promotion job started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Promotion job stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_once(today_utc()).await {
                        tracing::error!(error = %e, "Promotion: pass failed");
                    }
                }
            }
        }
    }
}
