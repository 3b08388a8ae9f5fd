//! Repository for the `tasks` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, feature_id, title, description, status, priority, \
    estimate_hours, due_date, created_at, updated_at";

/// Provides CRUD operations for development tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task. `status` defaults to `todo`, `priority` to `medium`.
    pub async fn create(pool: &PgPool, user_id: DbId, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, feature_id, title, description, status, priority,
                estimate_hours, due_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'todo'), COALESCE($6, 'medium'), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(input.feature_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.estimate_hours)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's tasks, oldest first, with optional status and feature filters.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::BIGINT IS NULL OR feature_id = $3)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&filter.status)
            .bind(filter.feature_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                feature_id = COALESCE($4, feature_id),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                estimate_hours = COALESCE($7, estimate_hours),
                due_date = COALESCE($8, due_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.feature_id)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.estimate_hours)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
