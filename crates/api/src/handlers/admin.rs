//! Admin-only dashboard handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use openlaunch_db::repositories::LaunchRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/stats
///
/// Launch totals per tier plus project and owner counts.
pub async fn get_stats(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = LaunchRepo::stats(&state.pool).await?;
    tracing::debug!(user_id = admin.user_id, total_launches = stats.total_launches, "Admin stats read");
    Ok(Json(DataResponse { data: stats }))
}
