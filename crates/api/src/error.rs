use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use openlaunch_core::error::CoreError;
use openlaunch_scheduler::ScheduleError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`ScheduleError`] for launch
/// scheduling rejections, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `openlaunch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A scheduling rejection or failure from `openlaunch_scheduler`.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource addressed by something other than a numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Scheduling rejections carry extra detail fields ---
            AppError::Schedule(err) => return schedule_error_response(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a scheduling error to its HTTP status.
pub fn schedule_status(err: &ScheduleError) -> StatusCode {
    match err {
        ScheduleError::OutOfWindow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScheduleError::UserLimitExceeded { .. }
        | ScheduleError::SlotFull { .. }
        | ScheduleError::AlreadyScheduled { .. } => StatusCode::CONFLICT,
        ScheduleError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ScheduleError::TransientFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Scheduling rejections carry their structured details next to the
/// standard `error` and `code` fields.
fn schedule_error_response(err: &ScheduleError) -> Response {
    let mut body = json!({
        "error": err.user_message(),
        "code": err.code(),
        "retryable": err.is_retryable(),
    });

    let details = match err {
        ScheduleError::OutOfWindow {
            tier,
            date,
            earliest,
            latest,
        } => json!({ "tier": tier, "date": date, "earliest": earliest, "latest": latest }),
        ScheduleError::UserLimitExceeded { count, limit } => {
            json!({ "count": count, "limit": limit })
        }
        ScheduleError::SlotFull { tier, date } => json!({ "tier": tier, "date": date }),
        ScheduleError::AlreadyScheduled { project_id } => json!({ "project_id": project_id }),
        ScheduleError::InvalidRequest(_) => json!({}),
        ScheduleError::TransientFailure(msg) => {
            tracing::error!(error = %msg, "Launch scheduling failed transiently");
            json!({})
        }
    };
    if let (Some(body), serde_json::Value::Object(details)) = (body.as_object_mut(), details) {
        body.extend(details);
    }

    (schedule_status(err), axum::Json(body)).into_response()
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
