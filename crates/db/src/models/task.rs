//! Development task model and DTOs.

use chrono::NaiveDate;
use opsdeck_core::development::TaskProgressInput;
use opsdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::impl_owned;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub feature_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub estimate_hours: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Task, "Task");

impl Task {
    pub fn progress_input(&self) -> TaskProgressInput<'_> {
        TaskProgressInput {
            status: &self.status,
            due_date: self.due_date,
            estimate_hours: self.estimate_hours,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub feature_id: Option<DbId>,
    /// Defaults to `todo` if omitted.
    pub status: Option<String>,
    pub priority: Option<String>,
    pub estimate_hours: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub feature_id: Option<DbId>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub estimate_hours: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

/// Query filters for listing tasks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub feature_id: Option<DbId>,
}
