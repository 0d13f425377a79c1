//! Handlers for draft projects and the owner dashboard.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use openlaunch_core::category::{
    normalize_category_ids, MAX_PROJECT_CATEGORIES, MIN_PROJECT_CATEGORIES,
};
use openlaunch_core::error::CoreError;
use openlaunch_core::launch::LaunchRecord;
use openlaunch_core::types::DbId;
use openlaunch_db::models::category::Category;
use openlaunch_db::models::project::{slugify, CreateProject, Project};
use openlaunch_db::repositories::{CategoryRepo, LaunchRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A project together with its categories and its launch, if scheduled.
#[derive(Debug, Serialize)]
pub struct ProjectWithLaunch {
    #[serde(flatten)]
    pub project: Project,
    pub categories: Vec<Category>,
    pub launch: Option<LaunchRecord>,
}

/// POST /api/v1/projects
///
/// Create a draft project owned by the caller, filed under one to three
/// existing categories. Scheduling its launch is a separate step
/// (`POST /api/v1/launches`).
pub async fn create_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;
    if slugify(&input.name).is_empty() {
        return Err(AppError::BadRequest(
            "Project name must contain at least one letter or digit".into(),
        ));
    }

    let category_ids = normalize_category_ids(&input.category_ids);
    if !(MIN_PROJECT_CATEGORIES..=MAX_PROJECT_CATEGORIES).contains(&category_ids.len()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A project needs {MIN_PROJECT_CATEGORIES} to {MAX_PROJECT_CATEGORIES} distinct categories"
        ))));
    }
    let missing = CategoryRepo::find_missing(&state.pool, &category_ids).await?;
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown categories: {}",
            missing.join(", ")
        ))));
    }

    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    let categories = CategoryRepo::list_for_project(&state.pool, project.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        project_id = project.id,
        slug = %project.slug,
        "Project created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProjectWithLaunch {
                project,
                categories,
                launch: None,
            },
        }),
    ))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            })
        })?;
    let categories = CategoryRepo::list_for_project(&state.pool, id).await?;
    let launch = LaunchRepo::find_by_project(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ProjectWithLaunch {
            project,
            categories,
            launch,
        },
    }))
}

/// GET /api/v1/me/projects
///
/// The caller's projects, newest first, each with its categories and launch.
pub async fn list_my_projects(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list_by_owner(&state.pool, auth.user_id).await?;
    let mut launches: HashMap<DbId, LaunchRecord> = LaunchRepo::list_by_user(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(|listing| (listing.launch.project_id, listing.launch))
        .collect();
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let mut categories = CategoryRepo::list_for_projects(&state.pool, &ids).await?;

    let data: Vec<ProjectWithLaunch> = projects
        .into_iter()
        .map(|project| ProjectWithLaunch {
            categories: categories.remove(&project.id).unwrap_or_default(),
            launch: launches.remove(&project.id),
            project,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}
