//! Launch entity rows and read models.

use serde::Serialize;
use sqlx::FromRow;
use openlaunch_core::error::CoreError;
use openlaunch_core::launch::{LaunchRecord, LaunchStatus, LaunchTier, LookupId};
use openlaunch_core::types::{DbId, LaunchDate, Timestamp};

/// A row from the `launches` table.
#[derive(Debug, Clone, FromRow)]
pub struct LaunchRow {
    pub id: DbId,
    pub project_id: DbId,
    pub tier_id: LookupId,
    pub status_id: LookupId,
    pub scheduled_date: LaunchDate,
    pub created_by: DbId,
    pub upvote_count: i64,
    pub daily_ranking: Option<i16>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<LaunchRow> for LaunchRecord {
    type Error = CoreError;

    fn try_from(row: LaunchRow) -> Result<Self, Self::Error> {
        Ok(LaunchRecord {
            id: row.id,
            project_id: row.project_id,
            tier: LaunchTier::from_id(row.tier_id)?,
            scheduled_date: row.scheduled_date,
            status: LaunchStatus::from_id(row.status_id)?,
            created_by: row.created_by,
            upvote_count: row.upvote_count,
            daily_ranking: row.daily_ranking,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A launch joined with the display fields of its project.
#[derive(Debug, Clone, FromRow)]
pub struct LaunchListingRow {
    #[sqlx(flatten)]
    pub launch: LaunchRow,
    pub project_name: String,
    pub project_slug: String,
    pub website_url: String,
}

/// Serializable launch listing entry (day view, winners, leaderboard, dashboard).
#[derive(Debug, Clone, Serialize)]
pub struct LaunchListing {
    #[serde(flatten)]
    pub launch: LaunchRecord,
    pub project_name: String,
    pub project_slug: String,
    pub website_url: String,
}

impl TryFrom<LaunchListingRow> for LaunchListing {
    type Error = CoreError;

    fn try_from(row: LaunchListingRow) -> Result<Self, Self::Error> {
        Ok(LaunchListing {
            launch: row.launch.try_into()?,
            project_name: row.project_name,
            project_slug: row.project_slug,
            website_url: row.website_url,
        })
    }
}

/// Committed launches per `(date, tier)`, as returned by the usage query.
#[derive(Debug, Clone, FromRow)]
pub struct SlotUsageRow {
    pub scheduled_date: LaunchDate,
    pub tier_id: LookupId,
    pub launch_count: i64,
}

/// Row counts touched by one promotion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PromotionSummary {
    /// `scheduled` launches moved to `ongoing`.
    pub started: u64,
    /// `ongoing` launches moved to `launched`.
    pub launched: u64,
    /// Launches that received a daily ranking.
    pub ranked: u64,
}

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct PlatformStats {
    pub total_launches: i64,
    pub free_launches: i64,
    pub premium_launches: i64,
    pub premium_plus_launches: i64,
    pub total_projects: i64,
    pub total_owners: i64,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn row(tier_id: LookupId, status_id: LookupId) -> LaunchRow {
        LaunchRow {
            id: 1,
            project_id: 2,
            tier_id,
            status_id,
            scheduled_date: "2024-06-01".parse().unwrap(),
            created_by: 3,
            upvote_count: 4,
            daily_ranking: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_lookup_ids() {
        let record = LaunchRecord::try_from(row(3, 2)).unwrap();
        assert_eq!(record.tier, LaunchTier::PremiumPlus);
        assert_eq!(record.status, LaunchStatus::Ongoing);
        assert_eq!(record.upvote_count, 4);
    }

    #[test]
    fn unknown_lookup_ids_are_internal_errors() {
        assert!(matches!(
            LaunchRecord::try_from(row(9, 1)),
            Err(CoreError::Internal(_))
        ));
        assert!(matches!(
            LaunchRecord::try_from(row(1, 0)),
            Err(CoreError::Internal(_))
        ));
    }
}
