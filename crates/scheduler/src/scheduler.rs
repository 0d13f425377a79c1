//! Launch scheduler: validation followed by an atomic commit.

use std::sync::Arc;

use openlaunch_core::capacity::SlotCapacityPolicy;
use openlaunch_core::launch::{LaunchRecord, NewLaunch};
use openlaunch_core::types::LaunchDate;

use crate::availability::AvailabilityCalculator;
use crate::error::ScheduleError;
use crate::rate_limit::RateLimiter;
use crate::store::{CommitLimits, CommitOutcome, LaunchStore};

/// Orchestrates window, per-user and capacity checks, then commits.
///
/// Cheap to clone; shared via `Arc` in application state.
#[derive(Clone)]
pub struct Scheduler {
    policy: Arc<SlotCapacityPolicy>,
    store: Arc<dyn LaunchStore>,
    availability: AvailabilityCalculator,
    rate_limiter: RateLimiter,
}

impl Scheduler {
    pub fn new(policy: SlotCapacityPolicy, store: Arc<dyn LaunchStore>) -> Self {
        let policy = Arc::new(policy);
        Self {
            availability: AvailabilityCalculator::new(Arc::clone(&policy), Arc::clone(&store)),
            rate_limiter: RateLimiter::new(Arc::clone(&policy), Arc::clone(&store)),
            policy,
            store,
        }
    }

    pub fn policy(&self) -> &SlotCapacityPolicy {
        &self.policy
    }

    pub fn availability(&self) -> &AvailabilityCalculator {
        &self.availability
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Schedule `launch`, evaluating the tier window relative to `today`.
    ///
    /// Checks run in order and the first failure is returned:
    ///
    /// 1. the project has no launch yet,
    /// 2. the date lies inside the tier's window,
    /// 3. the user is below the per-user daily limit,
    /// 4. the tier still has a slot on that date.
    ///
    /// The commit re-verifies 1, 3 and 4 atomically, so a request that loses
    /// a race is rejected and leaves nothing behind.
    pub async fn schedule_launch(
        &self,
        launch: &NewLaunch,
        today: LaunchDate,
    ) -> Result<LaunchRecord, ScheduleError> {
        let tier = launch.tier;
        let date = launch.scheduled_date;

        if self.store.launch_for_project(launch.project_id).await?.is_some() {
            tracing::debug!(project_id = launch.project_id, "Project already has a launch");
            return Err(ScheduleError::AlreadyScheduled {
                project_id: launch.project_id,
            });
        }

        let window = self.policy.window_for(tier, today);
        if !window.contains(date) {
            tracing::debug!(%tier, %date, "Launch date outside tier window");
            return Err(ScheduleError::OutOfWindow {
                tier,
                date,
                earliest: window.earliest,
                latest: window.latest,
            });
        }

        let user_check = self
            .rate_limiter
            .check_user_limit(launch.created_by, date)
            .await?;
        if !user_check.allowed {
            tracing::debug!(
                user_id = launch.created_by,
                %date,
                count = user_check.count,
                "User launch limit reached"
            );
            return Err(ScheduleError::UserLimitExceeded {
                count: user_check.count,
                limit: user_check.limit,
            });
        }

        let slot_limit = self.policy.daily_limit(tier);
        let booked = self.store.count_for_slot(tier, date).await?;
        if booked >= slot_limit {
            tracing::debug!(%tier, %date, booked, "Launch day full for tier");
            return Err(ScheduleError::SlotFull { tier, date });
        }

        let limits = CommitLimits {
            slot_limit,
            user_limit: user_check.limit,
        };
        match self.store.commit(launch, limits).await? {
            CommitOutcome::Committed(record) => {
                tracing::info!(
                    launch_id = record.id,
                    project_id = record.project_id,
                    user_id = record.created_by,
                    %tier,
                    %date,
                    "Launch scheduled"
                );
                Ok(record)
            }
            CommitOutcome::SlotFull => {
                tracing::warn!(%tier, %date, "Lost slot to a concurrent commit");
                Err(ScheduleError::SlotFull { tier, date })
            }
            CommitOutcome::UserLimitReached { count } => {
                tracing::warn!(
                    user_id = launch.created_by,
                    %date,
                    "User limit reached by a concurrent commit"
                );
                Err(ScheduleError::UserLimitExceeded {
                    count,
                    limit: user_check.limit,
                })
            }
        }
    }
}
