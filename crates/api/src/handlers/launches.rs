//! Handlers for launch scheduling, availability and launch listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use openlaunch_core::error::CoreError;
use openlaunch_core::launch::{LaunchRecord, LaunchTier, NewLaunch};
use openlaunch_core::types::{today_utc, DbId, LaunchDate};
use openlaunch_db::repositories::{LaunchRepo, ProjectRepo};
use openlaunch_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{DateParams, DateRangeParams, LeaderboardParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of leaderboard entries.
const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
/// Upper bound for `?limit=` on the leaderboard.
const MAX_LEADERBOARD_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /launches`.
#[derive(Debug, Deserialize)]
pub struct ScheduleLaunchRequest {
    pub project_id: DbId,
    pub tier: LaunchTier,
    pub scheduled_date: LaunchDate,
}

/// A committed launch plus the payment hand-off flag for paid tiers.
#[derive(Debug, Serialize)]
pub struct ScheduledLaunch {
    pub launch: LaunchRecord,
    pub requires_payment: bool,
}

#[derive(Debug, Serialize)]
pub struct TierPolicy {
    pub tier: LaunchTier,
    pub daily_limit: i64,
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
    pub requires_payment: bool,
    /// First date this tier can book today.
    pub earliest: LaunchDate,
    /// Last date this tier can book today.
    pub latest: LaunchDate,
}

#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub today: LaunchDate,
    pub per_user_daily_limit: i64,
    pub tiers: Vec<TierPolicy>,
}

// ---------------------------------------------------------------------------
// Policy and availability
// ---------------------------------------------------------------------------

/// GET /api/v1/launches/policy
///
/// The configured capacity policy with each tier's window as of today (UTC).
pub async fn get_policy(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let policy = state.scheduler.policy();
    let today = today_utc();

    let tiers = LaunchTier::ALL
        .into_iter()
        .map(|tier| {
            let limits = policy.limits_for(tier);
            let window = policy.window_for(tier, today);
            TierPolicy {
                tier,
                daily_limit: limits.daily_limit,
                min_days_ahead: limits.min_days_ahead,
                max_days_ahead: limits.max_days_ahead,
                requires_payment: tier.requires_payment(),
                earliest: window.earliest,
                latest: window.latest,
            }
        })
        .collect();

    Ok(Json(DataResponse {
        data: PolicyResponse {
            today,
            per_user_daily_limit: policy.per_user_daily_limit(),
            tiers,
        },
    }))
}

/// GET /api/v1/launches/availability?start=&end=
///
/// Remaining slots per tier for every day of an inclusive range.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let days = state
        .scheduler
        .availability()
        .availability(params.start, params.end)
        .await?;
    Ok(Json(DataResponse { data: days }))
}

/// GET /api/v1/launches/availability/{tier}
///
/// Availability across the tier's own scheduling window as of today (UTC).
pub async fn get_tier_availability(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tier: LaunchTier = tier.parse()?;
    let days = state
        .scheduler
        .availability()
        .availability_for_tier(tier, today_utc())
        .await?;
    Ok(Json(DataResponse { data: days }))
}

/// GET /api/v1/launches/user-limit?date=
///
/// Whether the caller may still schedule a launch on `date`.
pub async fn get_user_limit(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params
        .date
        .ok_or_else(|| AppError::BadRequest("Query parameter 'date' is required".into()))?;
    let check = state
        .scheduler
        .rate_limiter()
        .check_user_limit(auth.user_id, date)
        .await?;
    Ok(Json(DataResponse { data: check }))
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// POST /api/v1/launches
///
/// Schedule a launch for one of the caller's projects. Admins may schedule
/// any project; the per-user limit always applies to the project owner.
pub async fn schedule_launch(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScheduleLaunchRequest>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;
    auth.ensure_owner(project.owner_id)?;

    let launch = NewLaunch {
        project_id: project.id,
        tier: input.tier,
        scheduled_date: input.scheduled_date,
        created_by: project.owner_id,
    };
    let record = state.scheduler.schedule_launch(&launch, today_utc()).await?;

    state.event_bus.publish(PlatformEvent::launch_scheduled(
        &record,
        &project.name,
        &project.slug,
        &project.website_url,
    ));

    tracing::info!(
        launch_id = record.id,
        project_id = project.id,
        acting_user_id = auth.user_id,
        "Launch scheduled via API"
    );

    let requires_payment = record.tier.requires_payment();
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ScheduledLaunch {
                launch: record,
                requires_payment,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/launches/{id}
pub async fn get_launch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let launch = LaunchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Launch",
            id,
        }))?;
    Ok(Json(DataResponse { data: launch }))
}

/// GET /api/v1/launches/day?date=
///
/// All launches of a day, podium first. Defaults to today (UTC).
pub async fn list_day(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.date.unwrap_or_else(today_utc);
    let launches = LaunchRepo::list_by_date(&state.pool, date).await?;
    Ok(Json(DataResponse { data: launches }))
}

/// GET /api/v1/launches/winners?date=
///
/// The ranked launches of a finished day. Defaults to yesterday (UTC).
pub async fn list_winners(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params
        .date
        .unwrap_or_else(|| today_utc() - Duration::days(1));
    let winners = LaunchRepo::list_winners(&state.pool, date).await?;
    Ok(Json(DataResponse { data: winners }))
}

/// GET /api/v1/launches/leaderboard?month=YYYY-MM&limit=
///
/// Most upvoted launched projects of a month. Defaults to the current month.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = match params.month.as_deref() {
        Some(month) => month_range(month)?,
        None => current_month_range(today_utc()),
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let entries = LaunchRepo::leaderboard(&state.pool, start, end, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// First and last day of a `YYYY-MM` month.
pub fn month_range(month: &str) -> Result<(LaunchDate, LaunchDate), AppError> {
    let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!("Invalid month '{month}', expected YYYY-MM"))
    })?;
    Ok(month_bounds(first))
}

fn current_month_range(today: LaunchDate) -> (LaunchDate, LaunchDate) {
    month_bounds(today - Duration::days(i64::from(today.day0())))
}

fn month_bounds(first: LaunchDate) -> (LaunchDate, LaunchDate) {
    let last = first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first);
    (first, last)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(s: &str) -> LaunchDate {
        s.parse().unwrap()
    }

    #[test]
    fn month_range_covers_whole_month() {
        assert_eq!(
            month_range("2024-02").unwrap(),
            (date("2024-02-01"), date("2024-02-29"))
        );
        assert_eq!(
            month_range("2023-12").unwrap(),
            (date("2023-12-01"), date("2023-12-31"))
        );
    }

    #[test]
    fn month_range_rejects_garbage() {
        assert_matches!(month_range("2024-13"), Err(AppError::BadRequest(_)));
        assert_matches!(month_range("June"), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn current_month_starts_on_the_first() {
        assert_eq!(
            current_month_range(date("2024-06-17")),
            (date("2024-06-01"), date("2024-06-30"))
        );
    }
}
