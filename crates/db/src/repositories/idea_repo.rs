//! Repository for the `ideas` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::idea::{CreateIdea, Idea, UpdateIdea};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, user_id, name, description, status, total_score, created_at, updated_at";

/// Provides CRUD operations for ideas.
pub struct IdeaRepo;

impl IdeaRepo {
    /// Insert a new idea in `draft` with no score.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateIdea,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "INSERT INTO ideas (user_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE id = $1");
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's ideas, oldest first, optionally filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Fetch the caller's ideas among `ids`. Foreign and missing ids are skipped.
    pub async fn list_by_ids(
        pool: &PgPool,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE user_id = $1 AND id = ANY($2)");
        sqlx::query_as::<_, Idea>(&query)
            .bind(user_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn list_statuses(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM ideas WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an idea. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIdea,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an idea with its scores and scrub it from every comparison.
    ///
    /// Returns `true` if the idea existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM idea_scores WHERE idea_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE idea_comparisons SET idea_ids = array_remove(idea_ids, $1)
             WHERE $1 = ANY(idea_ids)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
