//! Notification model and DTOs.

use opsdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::impl_owned;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl_owned!(Notification, "Notification");

/// DTO for creating a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    /// Defaults to `info` if omitted.
    pub kind: Option<String>,
    pub title: String,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
}
