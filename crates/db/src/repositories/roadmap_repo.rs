//! Repository for the `roadmaps` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::roadmap::{CreateRoadmap, Roadmap, UpdateRoadmap};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, name, description, status, start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for roadmaps.
pub struct RoadmapRepo;

impl RoadmapRepo {
    /// Insert a new roadmap. `status` defaults to `draft`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateRoadmap,
    ) -> Result<Roadmap, sqlx::Error> {
        let query = format!(
            "INSERT INTO roadmaps (user_id, name, description, status, start_date, end_date)
             VALUES ($1, $2, $3, COALESCE($4, 'draft'), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Roadmap>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Roadmap>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roadmaps WHERE id = $1");
        sqlx::query_as::<_, Roadmap>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's roadmaps, most recently created first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Roadmap>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM roadmaps WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Roadmap>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_statuses(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM roadmaps WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRoadmap,
    ) -> Result<Option<Roadmap>, sqlx::Error> {
        let query = format!(
            "UPDATE roadmaps SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Roadmap>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a roadmap with its milestones and features. Tasks linked to
    /// those features are kept and unlinked.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE tasks SET feature_id = NULL
             WHERE feature_id IN (SELECT id FROM features WHERE roadmap_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM features WHERE roadmap_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM milestones WHERE roadmap_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM roadmaps WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
