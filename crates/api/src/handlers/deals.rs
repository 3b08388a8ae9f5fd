//! Handlers for the `/deals` resource.
//!
//! A deal moving into `won` raises a `deal_won` notification for its owner.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{
    ACTION_CREATED, ACTION_DELETED, ACTION_STATUS_CHANGED, ACTION_UPDATED, ENTITY_DEAL,
};
use opsdeck_core::error::CoreError;
use opsdeck_core::notifications::{deal_won_message, KIND_DEAL_WON};
use opsdeck_core::ownership::{require_owned, visible_to, CallerContext};
use opsdeck_core::sales::{
    pipeline_metrics, validate_deal_numbers, validate_deal_stage, DEAL_STAGE_WON,
};
use opsdeck_core::types::DbId;
use opsdeck_core::validation::validate_name;
use opsdeck_db::models::sales::{CreateDeal, Deal, UpdateDeal};
use opsdeck_db::repositories::{CustomerRepo, DealRepo};
use opsdeck_db::DbPool;
use serde_json::json;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::notify;
use crate::query::StageFilter;
use crate::response::DataResponse;
use crate::state::AppState;

async fn announce_if_won(pool: &DbPool, caller: &CallerContext, deal: &Deal) {
    if deal.stage == DEAL_STAGE_WON {
        notify::send(
            pool,
            caller.user_id,
            KIND_DEAL_WON,
            deal_won_message(&deal.title, deal.value),
            ENTITY_DEAL,
            deal.id,
        )
        .await;
    }
}

/// GET /deals?stage=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StageFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref stage) = params.stage {
        validate_deal_stage(stage)?;
    }
    let deals = DealRepo::list_for_user(&state.pool, auth.user_id, params.stage.as_deref()).await?;
    Ok(Json(DataResponse { data: deals }))
}

/// POST /deals
///
/// The customer must be one of the caller's.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDeal>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.title, "Title")?;
    if let Some(ref stage) = input.stage {
        validate_deal_stage(stage)?;
    }
    validate_deal_numbers(input.value, input.probability)?;

    let customer = CustomerRepo::find_by_id(&state.pool, input.customer_id).await?;
    if visible_to(customer, &caller).is_none() {
        return Err(CoreError::InvalidReference(format!(
            "Customer {} does not exist",
            input.customer_id
        ))
        .into());
    }

    let deal = DealRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(&state.pool, &caller, ACTION_CREATED, ENTITY_DEAL, deal.id, &deal.title).await;
    announce_if_won(&state.pool, &caller, &deal).await;
    tracing::info!(
        user_id = caller.user_id,
        deal_id = deal.id,
        customer_id = deal.customer_id,
        stage = %deal.stage,
        "Deal created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: deal })))
}

/// GET /deals/pipeline
///
/// Stage buckets with open, weighted, won and lost values and the win rate.
pub async fn pipeline(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let deals = DealRepo::list_for_user(&state.pool, auth.user_id, None).await?;
    let figures: Vec<_> = deals.iter().map(Deal::figures).collect();
    Ok(Json(DataResponse {
        data: pipeline_metrics(&figures),
    }))
}

/// GET /deals/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deal = visible_to(DealRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    Ok(Json(DataResponse { data: deal }))
}

/// PUT /deals/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDeal>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let existing = require_owned(DealRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    if let Some(ref title) = input.title {
        validate_name(title, "Title")?;
    }
    if let Some(ref stage) = input.stage {
        validate_deal_stage(stage)?;
    }
    validate_deal_numbers(input.value, input.probability)?;

    let deal = DealRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Deal", id })?;

    if deal.stage != existing.stage {
        activity::record_with_details(
            &state.pool,
            &caller,
            ACTION_STATUS_CHANGED,
            ENTITY_DEAL,
            id,
            &deal.title,
            Some(json!({ "from": existing.stage, "to": deal.stage })),
        )
        .await;
        announce_if_won(&state.pool, &caller, &deal).await;
    } else {
        activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_DEAL, id, &deal.title).await;
    }
    tracing::info!(
        user_id = caller.user_id,
        deal_id = id,
        stage = %deal.stage,
        "Deal updated",
    );

    Ok(Json(DataResponse { data: deal }))
}

/// DELETE /deals/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let deal = require_owned(DealRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    DealRepo::delete(&state.pool, id).await?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_DEAL, id, &deal.title).await;
    tracing::info!(user_id = caller.user_id, deal_id = id, "Deal deleted");

    Ok(StatusCode::NO_CONTENT)
}
