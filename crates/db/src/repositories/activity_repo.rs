//! Repository for the append-only `activities` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::{Activity, NewActivity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, action, entity_type, entity_id, description, details, created_at";

/// Provides inserts and feed queries for activity records.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one activity record.
    pub async fn record(pool: &PgPool, entry: &NewActivity) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activities (user_id, action, entity_type, entity_id, description, details)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(entry.user_id)
            .bind(entry.action)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.description)
            .bind(&entry.details)
            .fetch_one(pool)
            .await
    }

    /// Most recent activity of a user, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// History of one entity as seen by its owner, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        user_id: DbId,
        entity_type: &str,
        entity_id: DbId,
        limit: i64,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities
             WHERE user_id = $1 AND entity_type = $2 AND entity_id = $3
             ORDER BY created_at DESC, id DESC
             LIMIT $4"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(user_id)
            .bind(entity_type)
            .bind(entity_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
