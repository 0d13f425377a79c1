#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use jsonwebtoken::{encode, EncodingKey, Header};
use openlaunch_api::auth::jwt::{Claims, JwtConfig};
use openlaunch_api::config::ServerConfig;
use openlaunch_api::router::build_app_router;
use openlaunch_api::state::AppState;
use openlaunch_core::capacity::{SlotCapacityPolicy, TierLimits};
use openlaunch_db::PgLaunchStore;
use openlaunch_events::EventBus;
use openlaunch_scheduler::{InMemoryLaunchStore, LaunchStore, Scheduler};

/// Secret shared by the test config and [`token`].
pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Small limits so capacity is easy to exhaust: free 2/day (1..90 days
/// ahead), premium 1/day (1..30), premium plus 1/day (1..14), one launch per
/// user per day.
pub fn test_policy() -> SlotCapacityPolicy {
    SlotCapacityPolicy::new(
        TierLimits::new(2, 1, 90),
        TierLimits::new(1, 1, 30),
        TierLimits::new(1, 1, 14),
        1,
    )
    .unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        launch_webhook_url: None,
        app_url: "http://localhost:3000".to_string(),
        policy: test_policy(),
    }
}

/// Application state over `pool` with the given launch store.
pub fn test_state(pool: PgPool, store: Arc<dyn LaunchStore>) -> AppState {
    let config = test_config();
    AppState {
        pool,
        scheduler: Arc::new(Scheduler::new(config.policy.clone(), store)),
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// Build the full application router (same middleware stack as production)
/// over a real database.
pub fn build_test_app(pool: PgPool) -> Router {
    let store = Arc::new(PgLaunchStore::new(pool.clone()));
    build_app_router(test_state(pool, store), &test_config())
}

/// Build the router over an in-memory launch store.
///
/// The database pool is lazy and points nowhere, so only routes served
/// entirely by the scheduler (policy, availability, user limit) and requests
/// rejected before any query can be exercised.
pub fn build_memory_app(store: Arc<InMemoryLaunchStore>) -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://openlaunch@127.0.0.1:1/unused")
        .unwrap();
    build_app_router(test_state(pool, store), &test_config())
}

/// Sign a token the way the auth service does, valid for `ttl_secs`
/// (negative for an already expired token).
pub fn sign_token(user_id: i64, role: &str, secret: &str, ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + ttl_secs,
        iat: now,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Mint a 15-minute bearer token for `user_id`.
pub fn token(user_id: i64, role: &str) -> String {
    sign_token(user_id, role, TEST_JWT_SECRET, 15 * 60)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = auth {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}
