//! Handlers for the `/activities` resource (read-only).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::validate_entity_type;
use opsdeck_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use opsdeck_core::types::DbId;
use opsdeck_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /activities?limit=&offset=
pub async fn recent(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let activities = ActivityRepo::list_recent(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: activities }))
}

/// GET /activities/{entity_type}/{id}?limit=
///
/// Only the caller's own history is returned, so a foreign entity yields an
/// empty list.
pub async fn for_entity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    validate_entity_type(&entity_type)?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let activities =
        ActivityRepo::list_for_entity(&state.pool, auth.user_id, &entity_type, entity_id, limit)
            .await?;
    Ok(Json(DataResponse { data: activities }))
}
