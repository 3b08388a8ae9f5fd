//! Handlers for the `/ideas` resource: CRUD, ranking, and per-criterion scores.
//!
//! Score writes recalculate the idea total and status inside the same
//! transaction (see `IdeaScoreRepo`); the activity row follows the commit.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{
    ACTION_CREATED, ACTION_DELETED, ACTION_RECALCULATED, ACTION_SCORED, ACTION_UPDATED,
    ENTITY_IDEA,
};
use opsdeck_core::error::CoreError;
use opsdeck_core::ideas::{
    summarize_ideas, validate_idea_status, validate_manual_status, IDEA_STATUS_ARCHIVED,
};
use opsdeck_core::ownership::{require_owned, visible_to, CallerContext};
use opsdeck_core::ranking::{clamp_top_n, rank, top_rated};
use opsdeck_core::scoring::validate_score;
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_description, validate_name};
use opsdeck_db::models::idea::{CreateIdea, Idea, ScoringOutcome, UpdateIdea, UpsertIdeaScore};
use opsdeck_db::repositories::{IdeaCriterionRepo, IdeaRepo, IdeaScoreRepo};
use opsdeck_db::DbPool;
use serde_json::json;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{StatusFilter, TopParams};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Load an idea for mutation: `NotFound` if missing, `AccessDenied` if foreign.
pub(crate) async fn load_owned_idea(
    pool: &DbPool,
    id: DbId,
    caller: &CallerContext,
) -> AppResult<Idea> {
    let idea = IdeaRepo::find_by_id(pool, id).await?;
    Ok(require_owned(idea, id, caller)?)
}

async fn record_scoring(
    pool: &DbPool,
    caller: &CallerContext,
    action: &'static str,
    outcome: &ScoringOutcome,
    criterion_id: DbId,
) {
    let details = json!({
        "criterion_id": criterion_id,
        "score": outcome.score.as_ref().map(|s| s.score),
        "total_score": outcome.idea.total_score,
        "previous_status": outcome.previous_status,
        "status": outcome.idea.status,
    });
    activity::record_with_details(
        pool,
        caller,
        action,
        ENTITY_IDEA,
        outcome.idea.id,
        &outcome.idea.name,
        Some(details),
    )
    .await;
}

/* --------------------------------------------------------------------------
CRUD
-------------------------------------------------------------------------- */

/// GET /ideas
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        validate_idea_status(status)?;
    }
    let ideas = IdeaRepo::list_for_user(&state.pool, auth.user_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: ideas }))
}

/// POST /ideas
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIdea>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.name, "Name")?;
    validate_description(input.description.as_deref(), "Description")?;

    let idea = IdeaRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(&state.pool, &caller, ACTION_CREATED, ENTITY_IDEA, idea.id, &idea.name).await;
    tracing::info!(user_id = caller.user_id, idea_id = idea.id, "Idea created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: idea })))
}

/// GET /ideas/{id}
///
/// Missing or foreign ideas yield `data: null`.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let idea = visible_to(IdeaRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    Ok(Json(DataResponse { data: idea }))
}

/// PUT /ideas/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIdea>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let existing = load_owned_idea(&state.pool, id, &caller).await?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref status) = input.status {
        validate_manual_status(&existing.status, status, existing.total_score.is_some())?;
    }

    let mut idea = IdeaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Idea", id })?;

    // Leaving `archived` hands the status back to the scoring rules.
    if existing.status == IDEA_STATUS_ARCHIVED && idea.status != IDEA_STATUS_ARCHIVED {
        idea = IdeaScoreRepo::recalculate(&state.pool, id).await?.idea;
    }

    activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_IDEA, idea.id, &idea.name).await;
    tracing::info!(user_id = caller.user_id, idea_id = id, "Idea updated");

    Ok(Json(DataResponse { data: idea }))
}

/// DELETE /ideas/{id}
///
/// Removes the idea's scores and scrubs it from every comparison.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let idea = load_owned_idea(&state.pool, id, &caller).await?;

    IdeaRepo::delete(&state.pool, id).await?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_IDEA, id, &idea.name).await;
    tracing::info!(user_id = caller.user_id, idea_id = id, "Idea deleted");

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Ranking and summary
-------------------------------------------------------------------------- */

/// GET /ideas/ranked
///
/// All of the caller's ideas, best first; unscored ideas last.
pub async fn ranked(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let ideas = IdeaRepo::list_for_user(&state.pool, auth.user_id, None).await?;
    Ok(Json(DataResponse { data: rank(ideas) }))
}

/// GET /ideas/top?limit=
pub async fn top(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> AppResult<impl IntoResponse> {
    let ideas = IdeaRepo::list_for_user(&state.pool, auth.user_id, None).await?;
    let top = top_rated(ideas, clamp_top_n(params.limit));
    Ok(Json(DataResponse { data: top }))
}

/// GET /ideas/summary
pub async fn summary(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statuses = IdeaRepo::list_statuses(&state.pool, auth.user_id).await?;
    let summary = summarize_ideas(statuses.iter().map(String::as_str));
    Ok(Json(DataResponse { data: summary }))
}

/* --------------------------------------------------------------------------
Scores
-------------------------------------------------------------------------- */

/// GET /ideas/{id}/scores
///
/// Empty for missing or foreign ideas.
pub async fn list_scores(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let idea = visible_to(IdeaRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    let scores = match idea {
        Some(idea) => IdeaScoreRepo::list_for_idea(&state.pool, idea.id).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: scores }))
}

/// PUT /ideas/{id}/scores
///
/// Record (or replace) the score of one criterion and recalculate the idea.
pub async fn upsert_score(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpsertIdeaScore>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_score(input.score)?;
    validate_description(input.notes.as_deref(), "Notes")?;

    load_owned_idea(&state.pool, id, &caller).await?;
    let criterion = IdeaCriterionRepo::find_by_id(&state.pool, input.criterion_id).await?;
    require_owned(criterion, input.criterion_id, &caller)?;

    let outcome =
        IdeaScoreRepo::upsert_and_recalculate(&state.pool, caller.user_id, id, &input).await?;

    record_scoring(&state.pool, &caller, ACTION_SCORED, &outcome, input.criterion_id).await;
    tracing::info!(
        user_id = caller.user_id,
        idea_id = id,
        criterion_id = input.criterion_id,
        score = input.score,
        total_score = ?outcome.idea.total_score,
        status_changed = outcome.status_changed(),
        "Idea scored",
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /ideas/{id}/scores/{criterion_id}
pub async fn delete_score(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, criterion_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    load_owned_idea(&state.pool, id, &caller).await?;

    let outcome = IdeaScoreRepo::delete_and_recalculate(&state.pool, id, criterion_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Score",
            id: criterion_id,
        })?;

    record_scoring(&state.pool, &caller, ACTION_UPDATED, &outcome, criterion_id).await;
    tracing::info!(
        user_id = caller.user_id,
        idea_id = id,
        criterion_id,
        total_score = ?outcome.idea.total_score,
        "Idea score removed",
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /ideas/{id}/recalculate
pub async fn recalculate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    load_owned_idea(&state.pool, id, &caller).await?;

    let outcome = IdeaScoreRepo::recalculate(&state.pool, id).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_RECALCULATED,
        ENTITY_IDEA,
        id,
        &outcome.idea.name,
    )
    .await;
    tracing::info!(user_id = caller.user_id, idea_id = id, "Idea recalculated");

    Ok(Json(DataResponse { data: outcome }))
}
