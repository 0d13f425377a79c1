//! Repository for the `upvotes` table.

use sqlx::PgPool;
use openlaunch_core::launch::LaunchStatus;
use openlaunch_core::types::DbId;

use crate::models::upvote::UpvoteOutcome;

/// Provides the upvote toggle and lookups.
pub struct UpvoteRepo;

impl UpvoteRepo {
    /// Add the user's upvote to a launch, or remove it if already present.
    ///
    /// The launch row is locked for the duration of the transaction so the
    /// denormalised `upvote_count` always matches the `upvotes` rows.
    /// Only `ongoing` launches accept changes.
    pub async fn toggle(
        pool: &PgPool,
        launch_id: DbId,
        user_id: DbId,
    ) -> Result<UpvoteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status_id = sqlx::query_scalar::<_, i16>(
            "SELECT status_id FROM launches WHERE id = $1 FOR UPDATE",
        )
        .bind(launch_id)
        .fetch_optional(&mut *tx)
        .await?;

        match status_id {
            None => {
                tx.rollback().await?;
                return Ok(UpvoteOutcome::LaunchNotFound);
            }
            Some(id) if id != LaunchStatus::Ongoing.id() => {
                tx.rollback().await?;
                return Ok(UpvoteOutcome::NotOngoing);
            }
            Some(_) => {}
        }

        let removed = sqlx::query("DELETE FROM upvotes WHERE launch_id = $1 AND user_id = $2")
            .bind(launch_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        let delta: i64 = if removed {
            -1
        } else {
            sqlx::query("INSERT INTO upvotes (launch_id, user_id) VALUES ($1, $2)")
                .bind(launch_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            1
        };

        let upvote_count = sqlx::query_scalar::<_, i64>(
            "UPDATE launches SET upvote_count = upvote_count + $2, updated_at = NOW()
             WHERE id = $1
             RETURNING upvote_count",
        )
        .bind(launch_id)
        .bind(delta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(UpvoteOutcome::Toggled {
            upvoted: !removed,
            upvote_count,
        })
    }

    /// Whether the user currently upvotes the launch.
    pub async fn has_upvoted(
        pool: &PgPool,
        launch_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM upvotes WHERE launch_id = $1 AND user_id = $2)",
        )
        .bind(launch_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
