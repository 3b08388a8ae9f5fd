//! Notifications raised as a side effect of other writes.
//!
//! Like activity records these follow the write that triggers them; an
//! insert failure is logged and does not fail the request.

use opsdeck_core::types::DbId;
use opsdeck_db::repositories::{NewNotification, NotificationRepo};
use opsdeck_db::DbPool;

/// Insert one notification for `user_id` about an entity.
pub async fn send(
    pool: &DbPool,
    user_id: DbId,
    kind: &str,
    (title, message): (String, String),
    entity_type: &'static str,
    entity_id: DbId,
) {
    let input = NewNotification {
        user_id,
        kind,
        title: &title,
        message: &message,
        entity_type: Some(entity_type),
        entity_id: Some(entity_id),
    };

    match NotificationRepo::create(pool, &input).await {
        Ok(notification) => tracing::debug!(
            user_id,
            notification_id = notification.id,
            kind,
            entity_type,
            entity_id,
            "Notification sent",
        ),
        Err(e) => tracing::warn!(
            error = %e,
            user_id,
            kind,
            entity_type,
            entity_id,
            "Failed to send notification",
        ),
    }
}
