//! Handlers for the `/idea-criteria` resource.
//!
//! Weight changes and deletions report the ideas whose totals were
//! recalculated as a consequence.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{ACTION_CREATED, ACTION_DELETED, ACTION_UPDATED, ENTITY_IDEA_CRITERION};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::require_owned;
use opsdeck_core::scoring::validate_weight;
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_description, validate_name};
use opsdeck_db::models::idea::{
    CreateIdeaCriterion, CriterionWeight, Idea, IdeaCriterion, UpdateIdeaCriterion,
};
use opsdeck_db::repositories::IdeaCriterionRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A criterion write together with the ideas it caused to be rescored.
#[derive(Debug, Serialize)]
pub struct CriterionChange {
    pub criterion: IdeaCriterion,
    pub recalculated: Vec<Idea>,
}

/// Request body for `PUT /idea-criteria/weights`.
#[derive(Debug, Deserialize)]
pub struct SetWeightsRequest {
    pub weights: Vec<CriterionWeight>,
}

/// Response for `PUT /idea-criteria/weights`.
#[derive(Debug, Serialize)]
pub struct WeightsChange {
    pub criteria: Vec<IdeaCriterion>,
    pub recalculated: Vec<Idea>,
}

/// GET /idea-criteria
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let criteria = IdeaCriterionRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: criteria }))
}

/// POST /idea-criteria
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIdeaCriterion>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.name, "Name")?;
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(weight) = input.weight {
        validate_weight(weight)?;
    }

    let criterion = IdeaCriterionRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_CREATED,
        ENTITY_IDEA_CRITERION,
        criterion.id,
        &criterion.name,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        criterion_id = criterion.id,
        weight = criterion.weight,
        "Criterion created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: criterion })))
}

/// PUT /idea-criteria/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIdeaCriterion>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    require_owned(IdeaCriterionRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(weight) = input.weight {
        validate_weight(weight)?;
    }

    let (criterion, recalculated) = IdeaCriterionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Criterion",
            id,
        })?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_UPDATED,
        ENTITY_IDEA_CRITERION,
        id,
        &criterion.name,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        criterion_id = id,
        recalculated = recalculated.len(),
        "Criterion updated",
    );

    Ok(Json(DataResponse {
        data: CriterionChange {
            criterion,
            recalculated,
        },
    }))
}

/// PUT /idea-criteria/weights
///
/// Every referenced criterion must exist and belong to the caller; the
/// whole batch is rejected otherwise.
pub async fn set_weights(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetWeightsRequest>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    if input.weights.is_empty() {
        return Err(CoreError::Validation("At least one weight is required".into()).into());
    }
    for entry in &input.weights {
        validate_weight(entry.weight)?;
        let criterion = IdeaCriterionRepo::find_by_id(&state.pool, entry.criterion_id).await?;
        require_owned(criterion, entry.criterion_id, &caller)?;
    }

    let (criteria, recalculated) =
        IdeaCriterionRepo::set_weights(&state.pool, caller.user_id, &input.weights).await?;

    for criterion in &criteria {
        activity::record_with_details(
            &state.pool,
            &caller,
            ACTION_UPDATED,
            ENTITY_IDEA_CRITERION,
            criterion.id,
            &criterion.name,
            Some(json!({ "weight": criterion.weight })),
        )
        .await;
    }
    tracing::info!(
        user_id = caller.user_id,
        criteria = criteria.len(),
        recalculated = recalculated.len(),
        "Criterion weights updated",
    );

    Ok(Json(DataResponse {
        data: WeightsChange {
            criteria,
            recalculated,
        },
    }))
}

/// DELETE /idea-criteria/{id}
///
/// Returns the ideas recalculated after their scores for this criterion
/// were removed.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let criterion =
        require_owned(IdeaCriterionRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    let recalculated = IdeaCriterionRepo::delete(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Criterion",
            id,
        })?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_DELETED,
        ENTITY_IDEA_CRITERION,
        id,
        &criterion.name,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        criterion_id = id,
        recalculated = recalculated.len(),
        "Criterion deleted",
    );

    Ok(Json(DataResponse { data: recalculated }))
}
