//! Activity logging for mutating handlers.
//!
//! Each mutation appends one row to the activity log after its own write has
//! committed. A failed audit insert is logged and does not fail the request,
//! since the mutation it describes is already durable.

use opsdeck_core::activity::describe;
use opsdeck_core::ownership::CallerContext;
use opsdeck_core::types::DbId;
use opsdeck_db::models::activity::NewActivity;
use opsdeck_db::repositories::ActivityRepo;
use opsdeck_db::DbPool;

/// Append an activity record describing `action` on an entity.
pub async fn record(
    pool: &DbPool,
    caller: &CallerContext,
    action: &'static str,
    entity_type: &'static str,
    entity_id: DbId,
    name: &str,
) {
    record_with_details(pool, caller, action, entity_type, entity_id, name, None).await;
}

/// Like [`record`], with a JSON payload stored alongside the description.
pub async fn record_with_details(
    pool: &DbPool,
    caller: &CallerContext,
    action: &'static str,
    entity_type: &'static str,
    entity_id: DbId,
    name: &str,
    details: Option<serde_json::Value>,
) {
    let entry = NewActivity {
        user_id: caller.user_id,
        action,
        entity_type,
        entity_id,
        description: describe(action, entity_type, name),
        details,
    };

    if let Err(e) = ActivityRepo::record(pool, &entry).await {
        tracing::warn!(
            error = %e,
            user_id = caller.user_id,
            action,
            entity_type,
            entity_id,
            "Failed to record activity",
        );
    }
}
