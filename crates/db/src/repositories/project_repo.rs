//! Repository for the `projects` table.

use sqlx::PgPool;
use openlaunch_core::category::normalize_category_ids;
use openlaunch_core::types::DbId;

use crate::models::project::{first_free_slug, slugify, CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, slug, website_url, description, created_at, updated_at";

/// Slug picks raced by concurrent creates before giving up with a conflict.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner_id` with its categories,
    /// returning the created row.
    ///
    /// The slug is derived from the name. A taken slug gets the first free
    /// numeric suffix (`rocket-2`, `rocket-3`, ...). A website URL collision
    /// surfaces as a unique violation on `uq_projects_website_url`, and so
    /// does a slug still lost after [`MAX_SLUG_ATTEMPTS`] concurrent races.
    /// Category IDs must exist; the caller checks them first.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let base = slugify(&input.name);
        let mut tx = pool.begin().await?;

        let mut created = None;
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            // Slugs hold only alphanumerics and dashes, so no LIKE escaping.
            let taken = sqlx::query_scalar::<_, String>(
                "SELECT slug FROM projects WHERE slug = $1 OR slug LIKE $1 || '-%'",
            )
            .bind(&base)
            .fetch_all(&mut *tx)
            .await?;
            let slug = first_free_slug(&base, &taken);

            let on_conflict = if attempt < MAX_SLUG_ATTEMPTS {
                "ON CONFLICT ON CONSTRAINT uq_projects_slug DO NOTHING"
            } else {
                ""
            };
            let query = format!(
                "INSERT INTO projects (owner_id, name, slug, website_url, description)
                 VALUES ($1, $2, $3, $4, $5)
                 {on_conflict}
                 RETURNING {COLUMNS}"
            );
            created = sqlx::query_as::<_, Project>(&query)
                .bind(owner_id)
                .bind(input.name.trim())
                .bind(&slug)
                .bind(input.website_url.trim())
                .bind(&input.description)
                .fetch_optional(&mut *tx)
                .await?;
            if created.is_some() {
                break;
            }
            tracing::debug!(slug = %slug, attempt, "Project slug taken concurrently, retrying");
        }
        let project = created.ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query(
            "INSERT INTO project_categories (project_id, category_id)
             SELECT $1, unnest($2::text[])",
        )
        .bind(project.id)
        .bind(normalize_category_ids(&input.category_ids))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the projects owned by a user, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
