//! Entity models and DTOs.

pub mod category;
pub mod launch;
pub mod project;
pub mod upvote;
