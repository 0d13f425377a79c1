//! Scheduling rejections and storage failures.

use openlaunch_core::launch::LaunchTier;
use openlaunch_core::types::{DbId, LaunchDate};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Failure reported by a [`LaunchStore`](crate::LaunchStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The project already has a launch row.
    #[error("Project {0} already has a launch")]
    DuplicateProject(DbId),

    /// The backing store could not be reached or failed mid-operation.
    #[error("Launch store unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// ScheduleError
// ---------------------------------------------------------------------------

/// Why a scheduling request (or one of its read-side checks) did not succeed.
///
/// Every variant except [`TransientFailure`](Self::TransientFailure) is a
/// business outcome to show to the user. Transient failures should be retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("{date} is outside the {tier} launch window ({earliest} to {latest})")]
    OutOfWindow {
        tier: LaunchTier,
        date: LaunchDate,
        earliest: LaunchDate,
        latest: LaunchDate,
    },

    #[error("User already has {count} launch(es) on this date (limit {limit})")]
    UserLimitExceeded { count: i64, limit: i64 },

    #[error("No {tier} slots left on {date}")]
    SlotFull { tier: LaunchTier, date: LaunchDate },

    #[error("Project {project_id} is already scheduled")]
    AlreadyScheduled { project_id: DbId },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transient failure: {0}")]
    TransientFailure(String),
}

impl ScheduleError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfWindow { .. } => "OUT_OF_WINDOW",
            Self::UserLimitExceeded { .. } => "USER_LIMIT_EXCEEDED",
            Self::SlotFull { .. } => "SLOT_FULL",
            Self::AlreadyScheduled { .. } => "ALREADY_SCHEDULED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::TransientFailure(_) => "TRANSIENT_FAILURE",
        }
    }

    /// Actionable message for the person submitting the launch.
    pub fn user_message(&self) -> String {
        match self {
            Self::OutOfWindow {
                tier,
                earliest,
                latest,
                ..
            } => format!(
                "Please select a different date: {tier} launches can be scheduled \
                 between {earliest} and {latest}."
            ),
            Self::UserLimitExceeded { count, limit } => format!(
                "You have reached the daily limit for this date ({count}/{limit} launches). \
                 Please pick another day."
            ),
            Self::SlotFull { tier, date } => format!(
                "{date} is full for the {tier} plan. Please select another date."
            ),
            Self::AlreadyScheduled { .. } => {
                "This project already has a scheduled launch.".to_string()
            }
            Self::InvalidRequest(msg) => msg.clone(),
            Self::TransientFailure(_) => {
                "The launch could not be scheduled right now. Please try again.".to_string()
            }
        }
    }

    /// Whether the caller should retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFailure(_))
    }
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateProject(project_id) => Self::AlreadyScheduled { project_id },
            StoreError::Unavailable(msg) => Self::TransientFailure(msg),
        }
    }
}
