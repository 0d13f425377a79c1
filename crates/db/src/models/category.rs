//! Category rows.

use serde::Serialize;
use sqlx::FromRow;
use openlaunch_core::types::DbId;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A category with the number of its projects that are live or launched.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub project_count: i64,
}

/// A category joined to one of its projects.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectCategoryRow {
    pub project_id: DbId,
    #[sqlx(flatten)]
    pub category: Category,
}
