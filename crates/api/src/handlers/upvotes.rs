//! Handlers for upvotes on live launches.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use openlaunch_core::error::CoreError;
use openlaunch_core::types::DbId;
use openlaunch_db::models::upvote::{UpvoteOutcome, UpvoteStatus};
use openlaunch_db::repositories::{LaunchRepo, UpvoteRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/launches/{id}/upvote
///
/// Add the caller's upvote, or remove it if already present. Only launches
/// that are currently `ongoing` accept upvotes.
pub async fn toggle_upvote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(launch_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match UpvoteRepo::toggle(&state.pool, launch_id, auth.user_id).await? {
        UpvoteOutcome::LaunchNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Launch",
            id: launch_id,
        })),
        UpvoteOutcome::NotOngoing => Err(AppError::Core(CoreError::Conflict(
            "Upvotes are only accepted while the launch is live".into(),
        ))),
        outcome @ UpvoteOutcome::Toggled { upvoted, .. } => {
            tracing::debug!(user_id = auth.user_id, launch_id, upvoted, "Upvote toggled");
            Ok(Json(DataResponse { data: outcome }))
        }
    }
}

/// GET /api/v1/launches/{id}/upvote
///
/// Whether the caller currently upvotes the launch.
pub async fn get_upvote_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(launch_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let launch = LaunchRepo::find_by_id(&state.pool, launch_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Launch",
            id: launch_id,
        }))?;
    let upvoted = UpvoteRepo::has_upvoted(&state.pool, launch_id, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: UpvoteStatus {
            launch_id,
            upvoted,
            upvote_count: launch.upvote_count,
        },
    }))
}
