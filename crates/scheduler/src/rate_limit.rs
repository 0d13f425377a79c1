//! Per-user daily launch limit.

use std::sync::Arc;

use openlaunch_core::capacity::SlotCapacityPolicy;
use openlaunch_core::types::{DbId, LaunchDate};
use serde::Serialize;

use crate::error::ScheduleError;
use crate::store::LaunchStore;

/// Outcome of a per-user limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserLimitCheck {
    pub allowed: bool,
    pub count: i64,
    pub limit: i64,
}

/// Counts a user's committed launches on a date against the global limit.
#[derive(Clone)]
pub struct RateLimiter {
    policy: Arc<SlotCapacityPolicy>,
    store: Arc<dyn LaunchStore>,
}

impl RateLimiter {
    pub fn new(policy: Arc<SlotCapacityPolicy>, store: Arc<dyn LaunchStore>) -> Self {
        Self { policy, store }
    }

    /// Read-only; safe to call on every date change in an interactive flow.
    pub async fn check_user_limit(
        &self,
        user_id: DbId,
        date: LaunchDate,
    ) -> Result<UserLimitCheck, ScheduleError> {
        let count = self.store.count_for_user(user_id, date).await?;
        let limit = self.policy.per_user_daily_limit();
        Ok(UserLimitCheck {
            allowed: count < limit,
            count,
            limit,
        })
    }
}
