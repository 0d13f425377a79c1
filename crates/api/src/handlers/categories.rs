//! Handlers for categories and per-category project listings.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use openlaunch_db::repositories::{CategoryRepo, LaunchRepo};

use crate::error::{AppError, AppResult};
use crate::query::CategoryProjectsParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of projects in a category listing.
const DEFAULT_CATEGORY_LIMIT: i64 = 20;
/// Upper bound for `?limit=` on a category listing.
const MAX_CATEGORY_LIMIT: i64 = 100;

/// GET /api/v1/categories
///
/// Every category by name, with how many live or launched projects it holds.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{id}/projects?sort=&limit=
///
/// Ongoing and launched projects in a category, ordered by `sort`
/// (`recent`, `upvotes` or `alphabetical`).
pub async fn list_category_projects(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(params): Query<CategoryProjectsParams>,
) -> AppResult<impl IntoResponse> {
    let category_id = category_id.trim().to_lowercase();
    if CategoryRepo::find_by_id(&state.pool, &category_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!("Category '{category_id}' not found")));
    }
    let limit = params
        .limit
        .unwrap_or(DEFAULT_CATEGORY_LIMIT)
        .clamp(1, MAX_CATEGORY_LIMIT);

    let listing = LaunchRepo::list_by_category(&state.pool, &category_id, params.sort, limit).await?;
    Ok(Json(DataResponse { data: listing }))
}
