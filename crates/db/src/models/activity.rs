//! Activity log model.

use opsdeck_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::impl_owned;

/// A row from the append-only `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub description: String,
    pub details: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

impl_owned!(Activity, "Activity");

/// Insert payload for one activity record.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: DbId,
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub description: String,
    pub details: Option<serde_json::Value>,
}
