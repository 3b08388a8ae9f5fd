//! Repository for the `features` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::roadmap::{CreateFeature, Feature, UpdateFeature};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, roadmap_id, milestone_id, name, description, status, \
    priority, effort, impact, start_date, end_date, dependencies, created_at, updated_at";

/// Provides CRUD operations for roadmap features.
pub struct FeatureRepo;

impl FeatureRepo {
    /// Insert a feature under `roadmap_id`.
    ///
    /// `status` defaults to `planned`, `priority` to `medium`, effort and
    /// impact to 1. Dependency ids are stored as given; the caller verifies
    /// they belong to the same roadmap.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        roadmap_id: DbId,
        input: &CreateFeature,
    ) -> Result<Feature, sqlx::Error> {
        let query = format!(
            "INSERT INTO features (user_id, roadmap_id, milestone_id, name, description,
                status, priority, effort, impact, start_date, end_date, dependencies)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'planned'), COALESCE($7, 'medium'),
                COALESCE($8, 1), COALESCE($9, 1), $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(user_id)
            .bind(roadmap_id)
            .bind(input.milestone_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.effort)
            .bind(input.impact)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.dependencies)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Feature>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM features WHERE id = $1");
        sqlx::query_as::<_, Feature>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a roadmap's features in creation order.
    ///
    /// The order is stable so graph computations over the result are
    /// repeatable.
    pub async fn list_for_roadmap(
        pool: &PgPool,
        roadmap_id: DbId,
    ) -> Result<Vec<Feature>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM features
             WHERE roadmap_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(roadmap_id)
            .fetch_all(pool)
            .await
    }

    /// Return which of `ids` are features of `roadmap_id`.
    pub async fn ids_in_roadmap(
        pool: &PgPool,
        roadmap_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM features WHERE roadmap_id = $1 AND id = ANY($2)")
            .bind(roadmap_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Update a feature. Only non-`None` fields in `input` are applied;
    /// `clear_milestone` detaches it from its milestone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFeature,
    ) -> Result<Option<Feature>, sqlx::Error> {
        let query = format!(
            "UPDATE features SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                milestone_id = CASE WHEN $4 THEN NULL ELSE COALESCE($5, milestone_id) END,
                status = COALESCE($6, status),
                priority = COALESCE($7, priority),
                effort = COALESCE($8, effort),
                impact = COALESCE($9, impact),
                start_date = COALESCE($10, start_date),
                end_date = COALESCE($11, end_date),
                dependencies = COALESCE($12, dependencies)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.clear_milestone)
            .bind(input.milestone_id)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.effort)
            .bind(input.impact)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.dependencies)
            .fetch_optional(pool)
            .await
    }

    /// Delete a feature, scrub its id from every dependency list that names
    /// it and unlink its tasks.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE features SET dependencies = array_remove(dependencies, $1)
             WHERE $1 = ANY(dependencies)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE tasks SET feature_id = NULL WHERE feature_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
