//! Repository for the `categories` and `project_categories` tables.

use std::collections::HashMap;

use sqlx::PgPool;
use openlaunch_core::launch::PUBLIC_STATUS_IDS;
use openlaunch_core::types::DbId;

use crate::models::category::{Category, CategorySummary, ProjectCategoryRow};

/// Provides category lookups.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Every category, by name, with its count of ongoing or launched projects.
    pub async fn list(pool: &PgPool) -> Result<Vec<CategorySummary>, sqlx::Error> {
        sqlx::query_as::<_, CategorySummary>(
            "SELECT c.id, c.name, COUNT(l.id) AS project_count
             FROM categories c
             LEFT JOIN project_categories pc ON pc.category_id = c.id
             LEFT JOIN launches l ON l.project_id = pc.project_id AND l.status_id = ANY($1)
             GROUP BY c.id, c.name
             ORDER BY c.name ASC",
        )
        .bind(&PUBLIC_STATUS_IDS[..])
        .fetch_all(pool)
        .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The IDs in `ids` that name no category, in input order.
    pub async fn find_missing(pool: &PgPool, ids: &[String]) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT u.id
             FROM unnest($1::text[]) WITH ORDINALITY AS u(id, ord)
             LEFT JOIN categories c ON c.id = u.id
             WHERE c.id IS NULL
             ORDER BY u.ord",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Categories a project is filed under, by name.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name
             FROM project_categories pc
             JOIN categories c ON c.id = pc.category_id
             WHERE pc.project_id = $1
             ORDER BY c.name ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Categories of several projects at once, grouped by project ID.
    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Category>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectCategoryRow>(
            "SELECT pc.project_id, c.id, c.name
             FROM project_categories pc
             JOIN categories c ON c.id = pc.category_id
             WHERE pc.project_id = ANY($1)
             ORDER BY pc.project_id, c.name ASC",
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<Category>> = HashMap::new();
        for row in rows {
            grouped.entry(row.project_id).or_default().push(row.category);
        }
        Ok(grouped)
    }
}
