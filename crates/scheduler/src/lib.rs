//! Launch-slot allocation.
//!
//! - [`AvailabilityCalculator`] -- remaining slots per tier for each day of a
//!   date range.
//! - [`RateLimiter`] -- per-user, per-day launch limit.
//! - [`Scheduler`] -- validates a submission and commits it atomically
//!   through a [`LaunchStore`].
//! - [`InMemoryLaunchStore`] -- process-local store for tests and local runs.

pub mod availability;
pub mod error;
pub mod memory;
pub mod rate_limit;
pub mod scheduler;
pub mod store;

pub use availability::AvailabilityCalculator;
pub use error::{ScheduleError, StoreError};
pub use memory::InMemoryLaunchStore;
pub use rate_limit::{RateLimiter, UserLimitCheck};
pub use scheduler::Scheduler;
pub use store::{CommitLimits, CommitOutcome, LaunchStore};
