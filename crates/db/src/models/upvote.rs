//! Upvote toggling outcome and per-user upvote state.

use openlaunch_core::types::DbId;
use serde::Serialize;

/// Result of toggling the caller's upvote on a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpvoteOutcome {
    /// The upvote was added (`upvoted = true`) or removed.
    Toggled { upvoted: bool, upvote_count: i64 },
    /// No launch with that ID exists.
    LaunchNotFound,
    /// Upvotes are only accepted while the launch is ongoing.
    NotOngoing,
}

/// The caller's upvote state on one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpvoteStatus {
    pub launch_id: DbId,
    pub upvoted: bool,
    pub upvote_count: i64,
}
