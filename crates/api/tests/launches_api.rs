//! HTTP-level integration tests for projects, scheduling and upvotes.
//!
//! Drives the router against a real database through `tower::ServiceExt`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use common::{
    body_json, build_test_app, get, get_auth, post_auth, post_json_auth, test_config, test_state,
    token,
};
use openlaunch_api::router::build_app_router;
use openlaunch_core::types::{today_utc, LaunchDate};
use openlaunch_db::repositories::LaunchRepo;
use openlaunch_db::PgLaunchStore;
use openlaunch_events::LAUNCH_SCHEDULED;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn days_ahead(n: i64) -> LaunchDate {
    today_utc() + Duration::days(n)
}

/// Create a project via the API and return its id.
async fn create_project(pool: &PgPool, owner: i64, name: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({
            "name": name,
            "website_url": format!("https://{}.example.com", name.to_lowercase()),
            "category_ids": ["developer-tools"],
        }),
        &token(owner, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn schedule(
    pool: &PgPool,
    user: i64,
    project_id: i64,
    tier: &str,
    date: LaunchDate,
) -> (StatusCode, serde_json::Value) {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/launches",
        serde_json::json!({
            "project_id": project_id,
            "tier": tier,
            "scheduled_date": date,
        }),
        &token(user, "user"),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_returns_201_with_slug(pool: PgPool) {
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects",
        serde_json::json!({
            "name": "My Rocket App",
            "website_url": "https://rocket.example.com",
            "category_ids": ["AI", "saas"],
        }),
        &token(1, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "my-rocket-app");
    assert_eq!(json["data"]["owner_id"], 1);
    let categories: Vec<_> = json["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(categories, vec!["ai", "saas"]);
    assert!(json["data"]["launch"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_project_name_from_two_owners_is_suffixed(pool: PgPool) {
    let first = create_project(&pool, 1, "Rocket").await;
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({
            "name": "rocket",
            "website_url": "https://other-rocket.example.com",
            "category_ids": ["saas"],
        }),
        &token(2, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "rocket-2");
    assert_ne!(json["data"]["id"], first);

    let response = get(build_test_app(pool), &format!("/api/v1/projects/{first}")).await;
    assert_eq!(body_json(response).await["data"]["slug"], "rocket");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_checks_categories(pool: PgPool) {
    for categories in [
        serde_json::json!([]),
        serde_json::json!(["ai", "saas", "devops", "security"]),
        serde_json::json!(["ai", "time-travel"]),
        serde_json::json!(["  ", ""]),
    ] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/projects",
            serde_json::json!({
                "name": "Rocket",
                "website_url": "https://rocket.example.com",
                "category_ids": categories,
            }),
            &token(1, "user"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{categories}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    // Case-only duplicates collapse into one category.
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects",
        serde_json::json!({
            "name": "Rocket",
            "website_url": "https://rocket.example.com",
            "category_ids": ["ai", "AI", "saas"],
        }),
        &token(1, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["categories"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_validates_input(pool: PgPool) {
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects",
        serde_json::json!({"name": "", "website_url": "not-a-url"}),
        &token(1, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_website_returns_409(pool: PgPool) {
    create_project(&pool, 1, "Alpha").await;
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects",
        serde_json::json!({
            "name": "Alpha Two",
            "website_url": "https://alpha.example.com",
            "category_ids": ["saas"],
        }),
        &token(2, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_project_returns_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/projects/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_free_launch(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Freebie").await;
    let date = days_ahead(3);

    let (status, json) = schedule(&pool, 1, project_id, "free", date).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["requires_payment"], false);
    assert_eq!(json["data"]["launch"]["status"], "scheduled");
    assert_eq!(json["data"]["launch"]["scheduled_date"], date.to_string());

    // The project view now carries its launch.
    let response = get(build_test_app(pool.clone()), &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Freebie");
    assert_eq!(json["data"]["launch"]["tier"], "free");

    // And so does the owner's dashboard.
    let response = get_auth(build_test_app(pool), "/api/v1/me/projects", &token(1, "user")).await;
    let json = body_json(response).await;
    let projects = json["data"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["launch"]["project_id"], project_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_paid_tier_requires_payment(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Paid").await;
    let (status, json) = schedule(&pool, 1, project_id, "premium_plus", days_ahead(5)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["requires_payment"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_twice_returns_already_scheduled(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Twice").await;
    schedule(&pool, 1, project_id, "free", days_ahead(3)).await;

    let (status, json) = schedule(&pool, 1, project_id, "free", days_ahead(4)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_SCHEDULED");
    assert_eq!(json["project_id"], project_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_foreign_project_is_forbidden(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Mine").await;
    let (status, _) = schedule(&pool, 2, project_id, "free", days_ahead(3)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_window_returns_422_with_bounds(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Eager").await;

    let (status, json) = schedule(&pool, 1, project_id, "premium_plus", days_ahead(15)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "OUT_OF_WINDOW");
    assert_eq!(json["earliest"], days_ahead(1).to_string());
    assert_eq!(json["latest"], days_ahead(14).to_string());
    assert_eq!(json["retryable"], false);

    let (status, _) = schedule(&pool, 1, project_id, "free", today_utc()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_day_returns_slot_full(pool: PgPool) {
    // Free tier holds two launches per day in the test policy.
    let date = days_ahead(7);
    for user in 1..=2 {
        let project_id = create_project(&pool, user, &format!("Early{user}")).await;
        let (status, _) = schedule(&pool, user, project_id, "free", date).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let late = create_project(&pool, 3, "Late").await;
    let (status, json) = schedule(&pool, 3, late, "free", date).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "SLOT_FULL");
    assert_eq!(json["tier"], "free");
    assert_eq!(json["date"], date.to_string());

    // Premium still has room on the same day.
    let (status, _) = schedule(&pool, 3, late, "premium", date).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_launch_same_day_hits_user_limit(pool: PgPool) {
    let date = days_ahead(4);
    let first = create_project(&pool, 1, "First").await;
    let second = create_project(&pool, 1, "Second").await;
    schedule(&pool, 1, first, "free", date).await;

    let (status, json) = schedule(&pool, 1, second, "premium", date).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "USER_LIMIT_EXCEEDED");
    assert_eq!(json["count"], 1);
    assert_eq!(json["limit"], 1);

    // Nothing was written for the rejected project.
    assert!(LaunchRepo::find_by_project(&pool, second).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_publishes_launch_event(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Noisy").await;

    let state = test_state(pool.clone(), Arc::new(PgLaunchStore::new(pool.clone())));
    let mut events = state.event_bus.subscribe();
    let app = build_app_router(state, &test_config());

    let response = post_json_auth(
        app,
        "/api/v1/launches",
        serde_json::json!({"project_id": project_id, "tier": "free", "scheduled_date": days_ahead(2)}),
        &token(1, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let event = events.try_recv().expect("launch event should be published");
    assert_eq!(event.event_type, LAUNCH_SCHEDULED);
    assert_eq!(event.payload["project_slug"], "noisy");
    assert_eq!(event.actor_user_id, Some(1));
}

// ---------------------------------------------------------------------------
// Listings and upvotes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upvote_only_while_ongoing(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Votable").await;
    let date = days_ahead(1);
    let (_, json) = schedule(&pool, 1, project_id, "free", date).await;
    let launch_id = json["data"]["launch"]["id"].as_i64().unwrap();
    let voter = token(9, "user");

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/launches/{launch_id}/upvote"),
        &voter,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    LaunchRepo::promote(&pool, date).await.unwrap();

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/launches/{launch_id}/upvote"),
        &voter,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "toggled");
    assert_eq!(json["data"]["upvoted"], true);
    assert_eq!(json["data"]["upvote_count"], 1);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/launches/day?date={date}"),
    )
    .await;
    let json = body_json(response).await;
    let day = json["data"].as_array().unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0]["project_name"], "Votable");
    assert_eq!(day[0]["upvote_count"], 1);
    assert_eq!(day[0]["status"], "ongoing");

    let response = post_auth(build_test_app(pool), "/api/v1/launches/999999/upvote", &voter).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upvote_status_follows_toggles(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Tracked").await;
    let date = days_ahead(1);
    let (_, json) = schedule(&pool, 1, project_id, "free", date).await;
    let launch_id = json["data"]["launch"]["id"].as_i64().unwrap();
    LaunchRepo::promote(&pool, date).await.unwrap();
    let voter = token(9, "user");
    let uri = format!("/api/v1/launches/{launch_id}/upvote");

    let json = body_json(get_auth(build_test_app(pool.clone()), &uri, &voter).await).await;
    assert_eq!(json["data"]["upvoted"], false);
    assert_eq!(json["data"]["upvote_count"], 0);

    post_auth(build_test_app(pool.clone()), &uri, &voter).await;
    let json = body_json(get_auth(build_test_app(pool.clone()), &uri, &voter).await).await;
    assert_eq!(json["data"]["launch_id"], launch_id);
    assert_eq!(json["data"]["upvoted"], true);
    assert_eq!(json["data"]["upvote_count"], 1);

    // Another user sees the count but not an upvote of their own.
    let json = body_json(get_auth(build_test_app(pool.clone()), &uri, &token(10, "user")).await).await;
    assert_eq!(json["data"]["upvoted"], false);
    assert_eq!(json["data"]["upvote_count"], 1);

    let response = get(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool), "/api/v1/launches/999999/upvote", &voter).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_winners_after_day_ends(pool: PgPool) {
    let project_id = create_project(&pool, 1, "Champion").await;
    let date = days_ahead(1);
    let (_, json) = schedule(&pool, 1, project_id, "free", date).await;
    let launch_id = json["data"]["launch"]["id"].as_i64().unwrap();

    LaunchRepo::promote(&pool, date).await.unwrap();
    post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/launches/{launch_id}/upvote"),
        &token(9, "user"),
    )
    .await;
    LaunchRepo::promote(&pool, date + Duration::days(1)).await.unwrap();

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/launches/winners?date={date}"),
    )
    .await;
    let json = body_json(response).await;
    let winners = json["data"].as_array().unwrap();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0]["daily_ranking"], 1);
    assert_eq!(winners[0]["status"], "launched");

    let response = get(build_test_app(pool), &format!("/api/v1/launches/{launch_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "launched");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaderboard_rejects_bad_month(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/launches/leaderboard?month=2024-13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
