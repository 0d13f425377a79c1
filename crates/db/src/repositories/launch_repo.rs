//! Repository for the `launches` table.
//!
//! "Committed" launches are those in status `scheduled` or `ongoing`; only
//! they consume capacity. Every capacity count below filters on
//! [`COMMITTED_STATUS_IDS`].

use std::collections::BTreeMap;

use sqlx::{FromRow, PgPool};
use openlaunch_core::availability::SlotUsage;
use openlaunch_core::category::ProjectSort;
use openlaunch_core::error::CoreError;
use openlaunch_core::launch::{
    LaunchRecord, LaunchStatus, LaunchTier, NewLaunch, COMMITTED_STATUS_IDS, PUBLIC_STATUS_IDS,
};
use openlaunch_core::ranking::{assign_daily_rankings, RankCandidate};
use openlaunch_core::types::{DbId, LaunchDate, Timestamp};
use openlaunch_scheduler::{CommitLimits, CommitOutcome};

use crate::models::launch::{
    LaunchListing, LaunchListingRow, LaunchRow, PlatformStats, PromotionSummary, SlotUsageRow,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, tier_id, status_id, scheduled_date, created_by, \
    upvote_count, daily_ranking, created_at, updated_at";

/// Launch columns (aliased `l`) joined with project display fields (aliased `p`).
const LISTING_COLUMNS: &str = "l.id, l.project_id, l.tier_id, l.status_id, l.scheduled_date, \
    l.created_by, l.upvote_count, l.daily_ranking, l.created_at, l.updated_at, \
    p.name AS project_name, p.slug AS project_slug, p.website_url";

/// Ongoing launch considered for a podium place when its day ends.
#[derive(Debug, FromRow)]
struct EndingLaunchRow {
    id: DbId,
    scheduled_date: LaunchDate,
    upvote_count: i64,
    created_at: Timestamp,
}

/// Convert a fetched row into its domain type, reporting bad lookup IDs as
/// decode errors.
fn decode<R, T>(row: R) -> Result<T, sqlx::Error>
where
    R: TryInto<T, Error = CoreError>,
{
    row.try_into().map_err(|e: CoreError| sqlx::Error::Decode(Box::new(e)))
}

fn decode_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, sqlx::Error>
where
    R: TryInto<T, Error = CoreError>,
{
    rows.into_iter().map(decode).collect()
}

/// Provides queries and guarded writes for launches.
pub struct LaunchRepo;

impl LaunchRepo {
    /// Find a launch by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LaunchRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM launches WHERE id = $1");
        sqlx::query_as::<_, LaunchRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    /// Find the launch of a project, if it has been scheduled.
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<LaunchRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM launches WHERE project_id = $1");
        sqlx::query_as::<_, LaunchRow>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    /// All launches of one day, podium first, then by upvotes and submission time.
    pub async fn list_by_date(
        pool: &PgPool,
        date: LaunchDate,
    ) -> Result<Vec<LaunchListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM launches l
             JOIN projects p ON p.id = l.project_id
             WHERE l.scheduled_date = $1
             ORDER BY l.daily_ranking ASC NULLS LAST, l.upvote_count DESC, l.created_at ASC, l.id ASC"
        );
        let rows = sqlx::query_as::<_, LaunchListingRow>(&query)
            .bind(date)
            .fetch_all(pool)
            .await?;
        decode_all(rows)
    }

    /// The ranked launches (at most three) of one finished day.
    pub async fn list_winners(
        pool: &PgPool,
        date: LaunchDate,
    ) -> Result<Vec<LaunchListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM launches l
             JOIN projects p ON p.id = l.project_id
             WHERE l.scheduled_date = $1 AND l.daily_ranking IS NOT NULL
             ORDER BY l.daily_ranking ASC"
        );
        let rows = sqlx::query_as::<_, LaunchListingRow>(&query)
            .bind(date)
            .fetch_all(pool)
            .await?;
        decode_all(rows)
    }

    /// Most upvoted `launched` launches dated within `[start, end]`.
    pub async fn leaderboard(
        pool: &PgPool,
        start: LaunchDate,
        end: LaunchDate,
        limit: i64,
    ) -> Result<Vec<LaunchListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM launches l
             JOIN projects p ON p.id = l.project_id
             WHERE l.status_id = $1 AND l.scheduled_date BETWEEN $2 AND $3
             ORDER BY l.upvote_count DESC, l.created_at ASC, l.id ASC
             LIMIT $4"
        );
        let rows = sqlx::query_as::<_, LaunchListingRow>(&query)
            .bind(LaunchStatus::Launched.id())
            .bind(start)
            .bind(end)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        decode_all(rows)
    }

    /// Every launch submitted by a user, latest launch date first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LaunchListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM launches l
             JOIN projects p ON p.id = l.project_id
             WHERE l.created_by = $1
             ORDER BY l.scheduled_date DESC, l.id DESC"
        );
        let rows = sqlx::query_as::<_, LaunchListingRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        decode_all(rows)
    }

    /// Ongoing and launched projects filed under a category.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: &str,
        sort: ProjectSort,
        limit: i64,
    ) -> Result<Vec<LaunchListing>, sqlx::Error> {
        let order_by = match sort {
            ProjectSort::Recent => "p.created_at DESC, p.id DESC",
            ProjectSort::Upvotes => "l.upvote_count DESC, l.created_at ASC, l.id ASC",
            ProjectSort::Alphabetical => "LOWER(p.name) ASC, p.id ASC",
        };
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM launches l
             JOIN projects p ON p.id = l.project_id
             JOIN project_categories pc ON pc.project_id = p.id
             WHERE pc.category_id = $1 AND l.status_id = ANY($2)
             ORDER BY {order_by}
             LIMIT $3"
        );
        let rows = sqlx::query_as::<_, LaunchListingRow>(&query)
            .bind(category_id)
            .bind(&PUBLIC_STATUS_IDS[..])
            .bind(limit)
            .fetch_all(pool)
            .await?;
        decode_all(rows)
    }

    /// Launch counts per tier plus project and owner totals.
    pub async fn stats(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                 (SELECT COUNT(*) FROM launches) AS total_launches,
                 (SELECT COUNT(*) FROM launches WHERE tier_id = $1) AS free_launches,
                 (SELECT COUNT(*) FROM launches WHERE tier_id = $2) AS premium_launches,
                 (SELECT COUNT(*) FROM launches WHERE tier_id = $3) AS premium_plus_launches,
                 (SELECT COUNT(*) FROM projects) AS total_projects,
                 (SELECT COUNT(DISTINCT owner_id) FROM projects) AS total_owners",
        )
        .bind(LaunchTier::Free.id())
        .bind(LaunchTier::Premium.id())
        .bind(LaunchTier::PremiumPlus.id())
        .fetch_one(pool)
        .await
    }

    /// Committed launch counts per `(date, tier)` within `[start, end]`.
    pub async fn slot_usage(
        pool: &PgPool,
        start: LaunchDate,
        end: LaunchDate,
    ) -> Result<Vec<SlotUsage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SlotUsageRow>(
            "SELECT scheduled_date, tier_id, COUNT(*) AS launch_count
             FROM launches
             WHERE scheduled_date BETWEEN $1 AND $2 AND status_id = ANY($3)
             GROUP BY scheduled_date, tier_id
             ORDER BY scheduled_date ASC, tier_id ASC",
        )
        .bind(start)
        .bind(end)
        .bind(&COMMITTED_STATUS_IDS[..])
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let tier = LaunchTier::from_id(row.tier_id)
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
                Ok(SlotUsage {
                    date: row.scheduled_date,
                    tier,
                    count: row.launch_count,
                })
            })
            .collect()
    }

    /// Committed launches for one `(tier, date)` pair.
    pub async fn count_for_slot(
        pool: &PgPool,
        tier: LaunchTier,
        date: LaunchDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM launches
             WHERE tier_id = $1 AND scheduled_date = $2 AND status_id = ANY($3)",
        )
        .bind(tier.id())
        .bind(date)
        .bind(&COMMITTED_STATUS_IDS[..])
        .fetch_one(pool)
        .await
    }

    /// Committed launches created by a user on a date, across all tiers.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        date: LaunchDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM launches
             WHERE created_by = $1 AND scheduled_date = $2 AND status_id = ANY($3)",
        )
        .bind(user_id)
        .bind(date)
        .bind(&COMMITTED_STATUS_IDS[..])
        .fetch_one(pool)
        .await
    }

    /// Insert a `scheduled` launch only if both limits still hold.
    ///
    /// Runs in one transaction that first takes transaction-scoped advisory
    /// locks on the `(tier, date)` slot and then on the `(user, date)` pair.
    /// The lock order is fixed so two commits can never wait on each other.
    /// Both counts are re-read under the locks; a rejected commit rolls back
    /// and leaves no row behind. A second launch for the same project fails
    /// with a unique violation on `uq_launches_project_id`.
    pub async fn commit_guarded(
        pool: &PgPool,
        launch: &NewLaunch,
        limits: CommitLimits,
    ) -> Result<CommitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slot_key = format!("launch-slot:{}:{}", launch.tier.as_str(), launch.scheduled_date);
        let user_key = format!("launch-user:{}:{}", launch.created_by, launch.scheduled_date);
        for key in [&slot_key, &user_key] {
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }

        let booked = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM launches
             WHERE tier_id = $1 AND scheduled_date = $2 AND status_id = ANY($3)",
        )
        .bind(launch.tier.id())
        .bind(launch.scheduled_date)
        .bind(&COMMITTED_STATUS_IDS[..])
        .fetch_one(&mut *tx)
        .await?;
        if booked >= limits.slot_limit {
            tx.rollback().await?;
            return Ok(CommitOutcome::SlotFull);
        }

        let user_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM launches
             WHERE created_by = $1 AND scheduled_date = $2 AND status_id = ANY($3)",
        )
        .bind(launch.created_by)
        .bind(launch.scheduled_date)
        .bind(&COMMITTED_STATUS_IDS[..])
        .fetch_one(&mut *tx)
        .await?;
        if user_count >= limits.user_limit {
            tx.rollback().await?;
            return Ok(CommitOutcome::UserLimitReached { count: user_count });
        }

        let query = format!(
            "INSERT INTO launches (project_id, tier_id, status_id, scheduled_date, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LaunchRow>(&query)
            .bind(launch.project_id)
            .bind(launch.tier.id())
            .bind(LaunchStatus::Scheduled.id())
            .bind(launch.scheduled_date)
            .bind(launch.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CommitOutcome::Committed(decode(row)?))
    }

    /// Advance launch statuses for `today` in one transaction.
    ///
    /// First every `ongoing` launch dated before `today` becomes `launched`,
    /// and the top three of each finished day receive a `daily_ranking`.
    /// Then every `scheduled` launch dated on or before `today` becomes
    /// `ongoing`. Running it twice for the same day changes nothing.
    pub async fn promote(pool: &PgPool, today: LaunchDate) -> Result<PromotionSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let ending = sqlx::query_as::<_, EndingLaunchRow>(
            "SELECT id, scheduled_date, upvote_count, created_at
             FROM launches
             WHERE status_id = $1 AND scheduled_date < $2
             FOR UPDATE",
        )
        .bind(LaunchStatus::Ongoing.id())
        .bind(today)
        .fetch_all(&mut *tx)
        .await?;

        let mut by_day: BTreeMap<LaunchDate, Vec<RankCandidate>> = BTreeMap::new();
        for row in &ending {
            by_day.entry(row.scheduled_date).or_default().push(RankCandidate {
                launch_id: row.id,
                upvote_count: row.upvote_count,
                created_at: row.created_at,
            });
        }

        let launched = sqlx::query(
            "UPDATE launches SET status_id = $1, updated_at = NOW()
             WHERE status_id = $2 AND scheduled_date < $3",
        )
        .bind(LaunchStatus::Launched.id())
        .bind(LaunchStatus::Ongoing.id())
        .bind(today)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let mut ranked = 0;
        for candidates in by_day.values() {
            for (launch_id, rank) in assign_daily_rankings(candidates) {
                ranked += sqlx::query("UPDATE launches SET daily_ranking = $2 WHERE id = $1")
                    .bind(launch_id)
                    .bind(rank)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            }
        }

        let started = sqlx::query(
            "UPDATE launches SET status_id = $1, updated_at = NOW()
             WHERE status_id = $2 AND scheduled_date <= $3",
        )
        .bind(LaunchStatus::Ongoing.id())
        .bind(LaunchStatus::Scheduled.id())
        .bind(today)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(PromotionSummary {
            started,
            launched,
            ranked,
        })
    }
}
