//! Route definitions for launch scheduling and launch listings.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{launches, upvotes};
use crate::state::AppState;

/// Routes mounted at `/launches`.
///
/// ```text
/// POST   /                          schedule_launch
/// GET    /policy                    get_policy
/// GET    /availability              get_availability
/// GET    /availability/{tier}       get_tier_availability
/// GET    /user-limit                get_user_limit
/// GET    /day                       list_day
/// GET    /winners                   list_winners
/// GET    /leaderboard               leaderboard
/// GET    /{id}                      get_launch
/// GET    /{id}/upvote               get_upvote_status
/// POST   /{id}/upvote               toggle_upvote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(launches::schedule_launch))
        .route("/policy", get(launches::get_policy))
        .route("/availability", get(launches::get_availability))
        .route("/availability/{tier}", get(launches::get_tier_availability))
        .route("/user-limit", get(launches::get_user_limit))
        .route("/day", get(launches::list_day))
        .route("/winners", get(launches::list_winners))
        .route("/leaderboard", get(launches::leaderboard))
        .route("/{id}", get(launches::get_launch))
        .route(
            "/{id}/upvote",
            get(upvotes::get_upvote_status).post(upvotes::toggle_upvote),
        )
}
