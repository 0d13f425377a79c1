//! Storage seam for launch records.
//!
//! Implementations must make [`LaunchStore::commit`] a single atomic
//! conditional write: recount and insert under a guard so that concurrent
//! commits for the same `(tier, date)` or `(user, date)` can never both pass.

use async_trait::async_trait;
use openlaunch_core::availability::SlotUsage;
use openlaunch_core::launch::{LaunchRecord, LaunchTier, NewLaunch};
use openlaunch_core::types::{DbId, LaunchDate};

use crate::error::StoreError;

/// Limits re-verified inside the atomic commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitLimits {
    /// Daily limit of the launch's tier.
    pub slot_limit: i64,
    /// Per-user daily limit across all tiers.
    pub user_limit: i64,
}

/// Result of an atomic commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The launch was inserted with status `scheduled`.
    Committed(LaunchRecord),
    /// The `(tier, date)` pair was already at its limit.
    SlotFull,
    /// The user already had `count` committed launches on that date.
    UserLimitReached { count: i64 },
}

/// Read and write access to committed launches.
///
/// "Committed" means status `scheduled` or `ongoing`.
#[async_trait]
pub trait LaunchStore: Send + Sync {
    /// Committed launch counts grouped by date and tier within `[start, end]`.
    async fn slot_usage(
        &self,
        start: LaunchDate,
        end: LaunchDate,
    ) -> Result<Vec<SlotUsage>, StoreError>;

    /// The launch already recorded for `project_id`, in any status.
    async fn launch_for_project(&self, project_id: DbId) -> Result<Option<LaunchRecord>, StoreError>;

    /// Committed launches for one `(tier, date)` pair.
    async fn count_for_slot(&self, tier: LaunchTier, date: LaunchDate) -> Result<i64, StoreError>;

    /// Committed launches created by `user_id` on `date`, any tier.
    async fn count_for_user(&self, user_id: DbId, date: LaunchDate) -> Result<i64, StoreError>;

    /// Insert `launch` only if both limits still hold.
    async fn commit(
        &self,
        launch: &NewLaunch,
        limits: CommitLimits,
    ) -> Result<CommitOutcome, StoreError>;
}
