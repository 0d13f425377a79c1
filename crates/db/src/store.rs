//! PostgreSQL-backed [`LaunchStore`].

use async_trait::async_trait;
use openlaunch_core::availability::SlotUsage;
use openlaunch_core::launch::{LaunchRecord, LaunchTier, NewLaunch};
use openlaunch_core::types::{DbId, LaunchDate};
use openlaunch_scheduler::{CommitLimits, CommitOutcome, LaunchStore, StoreError};

use crate::repositories::LaunchRepo;
use crate::DbPool;

/// Constraint guarding one launch per project.
const PROJECT_UNIQUE_CONSTRAINT: &str = "uq_launches_project_id";

/// Launch store over the `launches` table.
#[derive(Clone)]
pub struct PgLaunchStore {
    pool: DbPool,
}

impl PgLaunchStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a database failure onto the scheduler's store error.
///
/// A unique violation on the per-project constraint is a business
/// rejection; everything else is treated as a transient outage.
fn map_store_error(project_id: DbId, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(PROJECT_UNIQUE_CONSTRAINT)
        {
            return StoreError::DuplicateProject(project_id);
        }
    }
    unavailable(err)
}

fn unavailable(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Launch store query failed");
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl LaunchStore for PgLaunchStore {
    async fn slot_usage(
        &self,
        start: LaunchDate,
        end: LaunchDate,
    ) -> Result<Vec<SlotUsage>, StoreError> {
        LaunchRepo::slot_usage(&self.pool, start, end)
            .await
            .map_err(unavailable)
    }

    async fn launch_for_project(&self, project_id: DbId) -> Result<Option<LaunchRecord>, StoreError> {
        LaunchRepo::find_by_project(&self.pool, project_id)
            .await
            .map_err(unavailable)
    }

    async fn count_for_slot(&self, tier: LaunchTier, date: LaunchDate) -> Result<i64, StoreError> {
        LaunchRepo::count_for_slot(&self.pool, tier, date)
            .await
            .map_err(unavailable)
    }

    async fn count_for_user(&self, user_id: DbId, date: LaunchDate) -> Result<i64, StoreError> {
        LaunchRepo::count_for_user(&self.pool, user_id, date)
            .await
            .map_err(unavailable)
    }

    async fn commit(
        &self,
        launch: &NewLaunch,
        limits: CommitLimits,
    ) -> Result<CommitOutcome, StoreError> {
        LaunchRepo::commit_guarded(&self.pool, launch, limits)
            .await
            .map_err(|e| map_store_error(launch.project_id, e))
    }
}
