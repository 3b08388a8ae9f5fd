//! Repository for the `deals` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::sales::{CreateDeal, Deal, UpdateDeal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, customer_id, title, value, stage, probability, \
    expected_close_date, closed_at, created_at, updated_at";

/// Provides CRUD operations for sales deals.
pub struct DealRepo;

impl DealRepo {
    /// Insert a deal. `stage` defaults to `lead`, `probability` to 10.
    pub async fn create(pool: &PgPool, user_id: DbId, input: &CreateDeal) -> Result<Deal, sqlx::Error> {
        let query = format!(
            "INSERT INTO deals (user_id, customer_id, title, value, stage, probability,
                expected_close_date, closed_at)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 'lead'), COALESCE($6, 10), $7,
                CASE WHEN COALESCE($5, 'lead') IN ('won', 'lost') THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(user_id)
            .bind(input.customer_id)
            .bind(&input.title)
            .bind(input.value)
            .bind(&input.stage)
            .bind(input.probability)
            .bind(input.expected_close_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deals WHERE id = $1");
        sqlx::query_as::<_, Deal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's deals, most recently created first, optionally by stage.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        stage: Option<&str>,
    ) -> Result<Vec<Deal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deals
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR stage = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(user_id)
            .bind(stage)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Deal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deals WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Update a deal. Only non-`None` fields in `input` are applied.
    ///
    /// `closed_at` is stamped when the deal enters `won` or `lost`, stamped
    /// again when it moves from one of them to the other, and cleared when it
    /// is reopened.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDeal,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!(
            "UPDATE deals SET
                title = COALESCE($2, title),
                value = COALESCE($3, value),
                stage = COALESCE($4, stage),
                probability = COALESCE($5, probability),
                expected_close_date = COALESCE($6, expected_close_date),
                closed_at = CASE
                    WHEN COALESCE($4, stage) NOT IN ('won', 'lost') THEN NULL
                    WHEN COALESCE($4, stage) = stage THEN COALESCE(closed_at, NOW())
                    ELSE NOW()
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.value)
            .bind(&input.stage)
            .bind(input.probability)
            .bind(input.expected_close_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
