//! Handlers for the `/idea-comparisons` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{
    ACTION_CREATED, ACTION_DELETED, ACTION_UPDATED, ENTITY_IDEA_COMPARISON,
};
use opsdeck_core::error::CoreError;
use opsdeck_core::ideas::validate_comparison_ideas;
use opsdeck_core::ownership::{require_owned, visible_to, CallerContext};
use opsdeck_core::ranking::rank;
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_description, validate_name};
use opsdeck_db::models::idea::{
    ComparisonWithIdeas, CreateIdeaComparison, IdeaComparison, UpdateIdeaComparison,
};
use opsdeck_db::repositories::{IdeaComparisonRepo, IdeaRepo};
use opsdeck_db::DbPool;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate a comparison's idea list and check every id is one of the
/// caller's ideas.
async fn ensure_comparable(
    pool: &DbPool,
    caller: &CallerContext,
    idea_ids: &[DbId],
) -> AppResult<()> {
    validate_comparison_ideas(idea_ids)?;

    let found = IdeaRepo::list_by_ids(pool, caller.user_id, idea_ids).await?;
    if let Some(missing) = idea_ids
        .iter()
        .find(|id| !found.iter().any(|idea| idea.id == **id))
    {
        return Err(CoreError::InvalidReference(format!("Idea {missing} does not exist")).into());
    }
    Ok(())
}

async fn load_owned(
    pool: &DbPool,
    id: DbId,
    caller: &CallerContext,
) -> AppResult<IdeaComparison> {
    let comparison = IdeaComparisonRepo::find_by_id(pool, id).await?;
    Ok(require_owned(comparison, id, caller)?)
}

/// GET /idea-comparisons
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let comparisons = IdeaComparisonRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: comparisons }))
}

/// POST /idea-comparisons
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIdeaComparison>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.name, "Name")?;
    validate_description(input.notes.as_deref(), "Notes")?;
    ensure_comparable(&state.pool, &caller, &input.idea_ids).await?;

    let comparison = IdeaComparisonRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_CREATED,
        ENTITY_IDEA_COMPARISON,
        comparison.id,
        &comparison.name,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        comparison_id = comparison.id,
        ideas = comparison.idea_ids.len(),
        "Comparison created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comparison })))
}

/// GET /idea-comparisons/{id}
///
/// The comparison with its ideas resolved and ranked best first. Ideas
/// deleted since the comparison was saved are simply absent.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let Some(comparison) =
        visible_to(IdeaComparisonRepo::find_by_id(&state.pool, id).await?, &caller)
    else {
        return Ok(Json(DataResponse { data: None }));
    };

    let ideas = IdeaRepo::list_by_ids(&state.pool, caller.user_id, &comparison.idea_ids).await?;
    Ok(Json(DataResponse {
        data: Some(ComparisonWithIdeas {
            comparison,
            ideas: rank(ideas),
        }),
    }))
}

/// PUT /idea-comparisons/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIdeaComparison>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    load_owned(&state.pool, id, &caller).await?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.notes.as_deref(), "Notes")?;
    if let Some(ref idea_ids) = input.idea_ids {
        ensure_comparable(&state.pool, &caller, idea_ids).await?;
    }

    let comparison = IdeaComparisonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Comparison",
            id,
        })?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_UPDATED,
        ENTITY_IDEA_COMPARISON,
        id,
        &comparison.name,
    )
    .await;
    tracing::info!(user_id = caller.user_id, comparison_id = id, "Comparison updated");

    Ok(Json(DataResponse { data: comparison }))
}

/// DELETE /idea-comparisons/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let comparison = load_owned(&state.pool, id, &caller).await?;

    IdeaComparisonRepo::delete(&state.pool, id).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_DELETED,
        ENTITY_IDEA_COMPARISON,
        id,
        &comparison.name,
    )
    .await;
    tracing::info!(user_id = caller.user_id, comparison_id = id, "Comparison deleted");

    Ok(StatusCode::NO_CONTENT)
}
