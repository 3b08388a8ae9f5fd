//! Handlers for the `/milestones/{id}` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{ACTION_DELETED, ACTION_UPDATED, ENTITY_MILESTONE};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::{require_owned, visible_to};
use opsdeck_core::ratio::percent_of;
use opsdeck_core::roadmap::validate_milestone_status;
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_description, validate_name};
use opsdeck_db::models::roadmap::{Milestone, MilestoneWithProgress, UpdateMilestone};
use opsdeck_db::repositories::MilestoneRepo;
use opsdeck_db::DbPool;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attach feature completion to a milestone.
pub(crate) async fn with_progress(
    pool: &DbPool,
    milestone: Milestone,
) -> AppResult<MilestoneWithProgress> {
    let (feature_count, completed_count) = MilestoneRepo::feature_progress(pool, milestone.id).await?;
    Ok(MilestoneWithProgress {
        milestone,
        feature_count,
        completed_count,
        progress: percent_of(completed_count as f64, feature_count as f64),
    })
}

/// GET /milestones/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let milestone = visible_to(MilestoneRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    let data = match milestone {
        Some(m) => Some(with_progress(&state.pool, m).await?),
        None => None,
    };
    Ok(Json(DataResponse { data }))
}

/// PUT /milestones/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestone>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    require_owned(MilestoneRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref status) = input.status {
        validate_milestone_status(status)?;
    }

    let milestone = MilestoneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Milestone",
            id,
        })?;

    activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_MILESTONE, id, &milestone.name)
        .await;
    tracing::info!(user_id = caller.user_id, milestone_id = id, "Milestone updated");

    Ok(Json(DataResponse {
        data: with_progress(&state.pool, milestone).await?,
    }))
}

/// DELETE /milestones/{id}
///
/// Features attached to the milestone are kept and detached.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let milestone =
        require_owned(MilestoneRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    let detached = MilestoneRepo::delete(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Milestone",
            id,
        })?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_MILESTONE, id, &milestone.name)
        .await;
    tracing::info!(
        user_id = caller.user_id,
        milestone_id = id,
        detached_features = detached,
        "Milestone deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
