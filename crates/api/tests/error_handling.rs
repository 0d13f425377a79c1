//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use openlaunch_api::error::AppError;
use openlaunch_core::error::CoreError;
use openlaunch_core::launch::LaunchTier;
use openlaunch_scheduler::ScheduleError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

// ---------------------------------------------------------------------------
// Core errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Project",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id 42 not found");
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("not yours".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid field value".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Scheduling rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn out_of_window_returns_422_with_bounds() {
    let err = AppError::Schedule(ScheduleError::OutOfWindow {
        tier: LaunchTier::PremiumPlus,
        date: date("2024-07-01"),
        earliest: date("2024-05-21"),
        latest: date("2024-06-03"),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "OUT_OF_WINDOW");
    assert_eq!(json["tier"], "premium_plus");
    assert_eq!(json["earliest"], "2024-05-21");
    assert_eq!(json["latest"], "2024-06-03");
    assert!(json["error"].as_str().unwrap().contains("2024-05-21"));
}

#[tokio::test]
async fn slot_full_returns_409() {
    let err = AppError::Schedule(ScheduleError::SlotFull {
        tier: LaunchTier::Free,
        date: date("2024-06-01"),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "SLOT_FULL");
    assert_eq!(json["tier"], "free");
    assert_eq!(json["date"], "2024-06-01");
    assert_eq!(json["retryable"], false);
}

#[tokio::test]
async fn user_limit_returns_409_with_counts() {
    let err = AppError::Schedule(ScheduleError::UserLimitExceeded { count: 1, limit: 1 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "USER_LIMIT_EXCEEDED");
    assert_eq!(json["count"], 1);
    assert_eq!(json["limit"], 1);
}

#[tokio::test]
async fn transient_failure_returns_503_and_hides_cause() {
    let err = AppError::Schedule(ScheduleError::TransientFailure(
        "connection refused to 10.0.0.5".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "TRANSIENT_FAILURE");
    assert_eq!(json["retryable"], true);
    assert!(!json["error"].as_str().unwrap().contains("10.0.0.5"));
}
