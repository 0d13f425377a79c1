//! Process-local [`LaunchStore`] backed by a `tokio::sync::Mutex`.
//!
//! Commits hold the lock across recount and insert, which gives the same
//! atomicity the PostgreSQL store gets from its transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use openlaunch_core::availability::SlotUsage;
use openlaunch_core::launch::{LaunchRecord, LaunchStatus, LaunchTier, NewLaunch};
use openlaunch_core::types::{DbId, LaunchDate};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::{CommitLimits, CommitOutcome, LaunchStore};

#[derive(Default)]
struct Inner {
    next_id: DbId,
    launches: Vec<LaunchRecord>,
}

impl Inner {
    fn committed(&self) -> impl Iterator<Item = &LaunchRecord> {
        self.launches.iter().filter(|l| l.status.is_committed())
    }

    fn count_for_slot(&self, tier: LaunchTier, date: LaunchDate) -> i64 {
        self.committed()
            .filter(|l| l.tier == tier && l.scheduled_date == date)
            .count() as i64
    }

    fn count_for_user(&self, user_id: DbId, date: LaunchDate) -> i64 {
        self.committed()
            .filter(|l| l.created_by == user_id && l.scheduled_date == date)
            .count() as i64
    }

    fn insert(&mut self, launch: &NewLaunch, status: LaunchStatus) -> LaunchRecord {
        self.next_id += 1;
        let now = Utc::now();
        let record = LaunchRecord {
            id: self.next_id,
            project_id: launch.project_id,
            tier: launch.tier,
            scheduled_date: launch.scheduled_date,
            status,
            created_by: launch.created_by,
            upvote_count: 0,
            daily_ranking: None,
            created_at: now,
            updated_at: now,
        };
        self.launches.push(record.clone());
        record
    }
}

/// In-memory launch store.
#[derive(Default)]
pub struct InMemoryLaunchStore {
    inner: Mutex<Inner>,
}

impl InMemoryLaunchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a launch with the given status, skipping every limit check.
    ///
    /// Intended for fixtures that need pre-existing bookings.
    pub async fn seed(&self, launch: NewLaunch, status: LaunchStatus) -> LaunchRecord {
        self.inner.lock().await.insert(&launch, status)
    }

    /// Move a launch to `status`. Returns `false` if the launch does not exist
    /// or the transition is not allowed.
    pub async fn advance(&self, launch_id: DbId, status: LaunchStatus) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.launches.iter_mut().find(|l| l.id == launch_id) {
            Some(launch) if launch.status.can_transition(status) => {
                launch.status = status;
                launch.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Snapshot of every stored launch, in insertion order.
    pub async fn launches(&self) -> Vec<LaunchRecord> {
        self.inner.lock().await.launches.clone()
    }
}

#[async_trait]
impl LaunchStore for InMemoryLaunchStore {
    async fn slot_usage(
        &self,
        start: LaunchDate,
        end: LaunchDate,
    ) -> Result<Vec<SlotUsage>, StoreError> {
        let inner = self.inner.lock().await;
        let mut grouped: BTreeMap<(LaunchDate, LaunchTier), i64> = BTreeMap::new();
        for launch in inner
            .committed()
            .filter(|l| start <= l.scheduled_date && l.scheduled_date <= end)
        {
            *grouped.entry((launch.scheduled_date, launch.tier)).or_default() += 1;
        }
        Ok(grouped
            .into_iter()
            .map(|((date, tier), count)| SlotUsage { date, tier, count })
            .collect())
    }

    async fn launch_for_project(&self, project_id: DbId) -> Result<Option<LaunchRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.launches.iter().find(|l| l.project_id == project_id).cloned())
    }

    async fn count_for_slot(&self, tier: LaunchTier, date: LaunchDate) -> Result<i64, StoreError> {
        Ok(self.inner.lock().await.count_for_slot(tier, date))
    }

    async fn count_for_user(&self, user_id: DbId, date: LaunchDate) -> Result<i64, StoreError> {
        Ok(self.inner.lock().await.count_for_user(user_id, date))
    }

    async fn commit(
        &self,
        launch: &NewLaunch,
        limits: CommitLimits,
    ) -> Result<CommitOutcome, StoreError> {
        let mut inner = self.inner.lock().await;

        if inner.launches.iter().any(|l| l.project_id == launch.project_id) {
            return Err(StoreError::DuplicateProject(launch.project_id));
        }
        if inner.count_for_slot(launch.tier, launch.scheduled_date) >= limits.slot_limit {
            return Ok(CommitOutcome::SlotFull);
        }
        let user_count = inner.count_for_user(launch.created_by, launch.scheduled_date);
        if user_count >= limits.user_limit {
            return Ok(CommitOutcome::UserLimitReached { count: user_count });
        }

        Ok(CommitOutcome::Committed(
            inner.insert(launch, LaunchStatus::Scheduled),
        ))
    }
}
