//! Handlers for the `/campaigns` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{ACTION_CREATED, ACTION_DELETED, ACTION_UPDATED, ENTITY_CAMPAIGN};
use opsdeck_core::campaigns::{
    campaign_metrics, campaign_totals, validate_campaign_numbers, validate_campaign_status,
    validate_channel,
};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::{require_owned, visible_to};
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_date_order, validate_description, validate_name};
use opsdeck_db::models::campaign::{Campaign, CampaignWithMetrics, CreateCampaign, UpdateCampaign};
use opsdeck_db::repositories::CampaignRepo;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

fn with_metrics(campaign: Campaign) -> CampaignWithMetrics {
    let metrics = campaign_metrics(
        campaign.budget,
        campaign.spent,
        campaign.leads,
        campaign.conversions,
    );
    CampaignWithMetrics { campaign, metrics }
}

/// GET /campaigns?status=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        validate_campaign_status(status)?;
    }
    let campaigns =
        CampaignRepo::list_for_user(&state.pool, auth.user_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /campaigns
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.name, "Name")?;
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref channel) = input.channel {
        validate_channel(channel)?;
    }
    if let Some(ref status) = input.status {
        validate_campaign_status(status)?;
    }
    validate_campaign_numbers(input.budget, input.spent, input.leads, input.conversions)?;
    validate_date_order(input.start_date, input.end_date)?;

    let campaign = CampaignRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_CREATED,
        ENTITY_CAMPAIGN,
        campaign.id,
        &campaign.name,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        campaign_id = campaign.id,
        channel = %campaign.channel,
        "Campaign created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: with_metrics(campaign) })))
}

/// GET /campaigns/summary
///
/// Status buckets plus budget, spend, lead and conversion totals.
pub async fn summary(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignRepo::list_for_user(&state.pool, auth.user_id, None).await?;
    let figures: Vec<_> = campaigns.iter().map(Campaign::figures).collect();
    Ok(Json(DataResponse {
        data: campaign_totals(&figures),
    }))
}

/// GET /campaigns/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = visible_to(CampaignRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    Ok(Json(DataResponse {
        data: campaign.map(with_metrics),
    }))
}

/// PUT /campaigns/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let existing = require_owned(CampaignRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref channel) = input.channel {
        validate_channel(channel)?;
    }
    if let Some(ref status) = input.status {
        validate_campaign_status(status)?;
    }
    validate_campaign_numbers(input.budget, input.spent, input.leads, input.conversions)?;
    validate_date_order(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;

    let campaign = CampaignRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Campaign",
            id,
        })?;

    activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_CAMPAIGN, id, &campaign.name)
        .await;
    tracing::info!(user_id = caller.user_id, campaign_id = id, "Campaign updated");

    Ok(Json(DataResponse {
        data: with_metrics(campaign),
    }))
}

/// DELETE /campaigns/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let campaign = require_owned(CampaignRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    CampaignRepo::delete(&state.pool, id).await?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_CAMPAIGN, id, &campaign.name)
        .await;
    tracing::info!(user_id = caller.user_id, campaign_id = id, "Campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}
