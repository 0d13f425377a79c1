//! Route definitions for the admin dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /stats                     get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(admin::get_stats))
}
