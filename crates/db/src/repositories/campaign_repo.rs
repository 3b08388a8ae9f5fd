//! Repository for the `campaigns` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, description, channel, status, budget, spent, \
    leads, conversions, start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for marketing campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a campaign. Missing numbers default to zero, `channel` to
    /// `other` and `status` to `draft`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (user_id, name, description, channel, status, budget, spent,
                leads, conversions, start_date, end_date)
             VALUES ($1, $2, $3, COALESCE($4, 'other'), COALESCE($5, 'draft'), COALESCE($6, 0),
                COALESCE($7, 0), COALESCE($8, 0), COALESCE($9, 0), $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.channel)
            .bind(&input.status)
            .bind(input.budget)
            .bind(input.spent)
            .bind(input.leads)
            .bind(input.conversions)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's campaigns, most recently created first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                channel = COALESCE($4, channel),
                status = COALESCE($5, status),
                budget = COALESCE($6, budget),
                spent = COALESCE($7, spent),
                leads = COALESCE($8, leads),
                conversions = COALESCE($9, conversions),
                start_date = COALESCE($10, start_date),
                end_date = COALESCE($11, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.channel)
            .bind(&input.status)
            .bind(input.budget)
            .bind(input.spent)
            .bind(input.leads)
            .bind(input.conversions)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
