pub mod admin;
pub mod categories;
pub mod health;
pub mod launches;
pub mod projects;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /launches/policy                     capacity policy and today's windows
/// /launches/availability               availability for ?start=&end=
/// /launches/availability/{tier}        availability over a tier's window
/// /launches/user-limit                 per-user limit check (auth)
/// /launches                            schedule (POST, auth)
/// /launches/day                        launches of a day
/// /launches/winners                    podium of a finished day
/// /launches/leaderboard                monthly leaderboard
/// /launches/{id}                       get
/// /launches/{id}/upvote                caller's upvote (GET), toggle (POST), auth
///
/// /projects                            create draft (POST, auth)
/// /projects/{id}                       get with launch and categories
///
/// /categories                          categories with project counts
/// /categories/{id}/projects            live and launched projects (?sort=&limit=)
///
/// /me/projects                         caller's projects (auth)
///
/// /admin/stats                         launch and project totals (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/launches", launches::router())
        .nest("/projects", projects::router())
        .nest("/categories", categories::router())
        .nest("/admin", admin::router())
        .route("/me/projects", get(handlers::projects::list_my_projects))
}
