//! Repository for the `milestones` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::roadmap::{CreateMilestone, Milestone, UpdateMilestone};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, roadmap_id, name, description, due_date, status, created_at, updated_at";

/// Provides CRUD operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Insert a milestone under `roadmap_id`. `status` defaults to `planned`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        roadmap_id: DbId,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones (user_id, roadmap_id, name, description, due_date, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'planned'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(user_id)
            .bind(roadmap_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a roadmap's milestones by due date; undated milestones last.
    pub async fn list_for_roadmap(
        pool: &PgPool,
        roadmap_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE roadmap_id = $1
             ORDER BY due_date ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(roadmap_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Count `(total, completed)` features attached to a milestone.
    pub async fn feature_progress(pool: &PgPool, id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'completed')
             FROM features WHERE milestone_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a milestone. Features that pointed to it are kept with their
    /// milestone reference cleared.
    ///
    /// Returns the number of features that were detached, or `None` if no
    /// milestone with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let detached = sqlx::query("UPDATE features SET milestone_id = NULL WHERE milestone_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(detached))
    }
}
