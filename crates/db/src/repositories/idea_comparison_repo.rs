//! Repository for the `idea_comparisons` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::idea::{CreateIdeaComparison, IdeaComparison, UpdateIdeaComparison};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, notes, idea_ids, created_at, updated_at";

/// Provides CRUD operations for idea comparisons.
pub struct IdeaComparisonRepo;

impl IdeaComparisonRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateIdeaComparison,
    ) -> Result<IdeaComparison, sqlx::Error> {
        let query = format!(
            "INSERT INTO idea_comparisons (user_id, name, notes, idea_ids)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IdeaComparison>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.notes)
            .bind(&input.idea_ids)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IdeaComparison>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM idea_comparisons WHERE id = $1");
        sqlx::query_as::<_, IdeaComparison>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's comparisons, most recently created first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<IdeaComparison>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM idea_comparisons WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, IdeaComparison>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIdeaComparison,
    ) -> Result<Option<IdeaComparison>, sqlx::Error> {
        let query = format!(
            "UPDATE idea_comparisons SET
                name = COALESCE($2, name),
                notes = COALESCE($3, notes),
                idea_ids = COALESCE($4, idea_ids)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IdeaComparison>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.notes)
            .bind(&input.idea_ids)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM idea_comparisons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
