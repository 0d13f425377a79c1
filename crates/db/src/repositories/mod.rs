//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod launch_repo;
pub mod project_repo;
pub mod upvote_repo;

pub use category_repo::CategoryRepo;
pub use launch_repo::LaunchRepo;
pub use project_repo::ProjectRepo;
pub use upvote_repo::UpvoteRepo;
