//! Handlers for the `/notifications` resource.
//!
//! Notifications are private to their recipient. Read-state changes are not
//! written to the activity log.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{validate_entity_type, ACTION_CREATED, ACTION_DELETED, ENTITY_NOTIFICATION};
use opsdeck_core::error::CoreError;
use opsdeck_core::notifications::{validate_notification, KIND_INFO};
use opsdeck_core::ownership::require_owned;
use opsdeck_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use opsdeck_core::types::DbId;
use opsdeck_db::models::notification::CreateNotification;
use opsdeck_db::repositories::{NewNotification, NotificationRepo};
use serde::Serialize;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::NotificationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: u64,
}

/// GET /notifications?unread_only=&limit=&offset=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, params.unread_only, limit, offset)
            .await?;
    Ok(Json(DataResponse { data: notifications }))
}

/// POST /notifications
///
/// Creates a notification addressed to the caller (reminders and notes).
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNotification>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let kind = input.kind.as_deref().unwrap_or(KIND_INFO);
    validate_notification(kind, &input.title, &input.message)?;
    if let Some(ref entity_type) = input.entity_type {
        validate_entity_type(entity_type)?;
    }

    let notification = NotificationRepo::create(
        &state.pool,
        &NewNotification {
            user_id: caller.user_id,
            kind,
            title: &input.title,
            message: &input.message,
            entity_type: input.entity_type.as_deref(),
            entity_id: input.entity_id,
        },
    )
    .await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_CREATED,
        ENTITY_NOTIFICATION,
        notification.id,
        &notification.title,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        notification_id = notification.id,
        kind,
        "Notification created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: notification })))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let unread = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { unread },
    }))
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, marked, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkedRead { marked },
    }))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    require_owned(NotificationRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    let notification = NotificationRepo::mark_read(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Notification",
            id,
        })?;

    Ok(Json(DataResponse { data: notification }))
}

/// DELETE /notifications/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let notification =
        require_owned(NotificationRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    NotificationRepo::delete(&state.pool, id).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_DELETED,
        ENTITY_NOTIFICATION,
        id,
        &notification.title,
    )
    .await;
    tracing::info!(user_id = caller.user_id, notification_id = id, "Notification deleted");

    Ok(StatusCode::NO_CONTENT)
}
