//! Query parameter types shared by the listing handlers.

use openlaunch_core::category::ProjectSort;
use openlaunch_core::types::LaunchDate;
use serde::Deserialize;

/// `?start=&end=` inclusive date range.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: LaunchDate,
    pub end: LaunchDate,
}

/// `?date=` with a handler-specific default when absent.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<LaunchDate>,
}

/// `?month=YYYY-MM&limit=` for the monthly leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub month: Option<String>,
    pub limit: Option<i64>,
}

/// `?sort=&limit=` for a category's project listing.
#[derive(Debug, Deserialize)]
pub struct CategoryProjectsParams {
    #[serde(default)]
    pub sort: ProjectSort,
    pub limit: Option<i64>,
}
