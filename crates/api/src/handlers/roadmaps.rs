//! Handlers for the `/roadmaps` resource and its nested milestones and
//! features.
//!
//! The dependency endpoints compute readiness and the critical path from the
//! roadmap's stored features on every call; nothing graph-related is cached.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{
    ACTION_CREATED, ACTION_DELETED, ACTION_UPDATED, ENTITY_FEATURE, ENTITY_MILESTONE,
    ENTITY_ROADMAP,
};
use opsdeck_core::dependency_graph::{analyze, critical_path, DanglingReference};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::{require_owned, visible_to, CallerContext};
use opsdeck_core::roadmap::{
    completion_percentage, summarize_features, summarize_milestones, summarize_roadmaps,
    validate_milestone_status, validate_roadmap_status,
};
use opsdeck_core::status_summary::StatusSummary;
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_date_order, validate_description, validate_name};
use opsdeck_db::models::roadmap::{
    feature_nodes, CreateFeature, CreateMilestone, CreateRoadmap, Roadmap, UpdateRoadmap,
};
use opsdeck_db::repositories::{FeatureRepo, MilestoneRepo, RoadmapRepo};
use opsdeck_db::DbPool;
use serde::Serialize;

use crate::activity;
use crate::error::AppResult;
use crate::handlers::features::{ensure_feature_refs, validate_feature_fields};
use crate::handlers::milestones::with_progress;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Status breakdowns and completion of one roadmap.
#[derive(Debug, Serialize)]
pub struct RoadmapOverview {
    pub roadmap: Roadmap,
    pub features: StatusSummary,
    pub milestones: StatusSummary,
    /// Share of completed features, one decimal.
    pub progress: f64,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

async fn load_owned(pool: &DbPool, id: DbId, caller: &CallerContext) -> AppResult<Roadmap> {
    let roadmap = RoadmapRepo::find_by_id(pool, id).await?;
    Ok(require_owned(roadmap, id, caller)?)
}

async fn load_visible(
    pool: &DbPool,
    id: DbId,
    caller: &CallerContext,
) -> AppResult<Option<Roadmap>> {
    Ok(visible_to(RoadmapRepo::find_by_id(pool, id).await?, caller))
}

fn warn_dangling(roadmap_id: DbId, dangling: &[DanglingReference]) {
    for d in dangling {
        tracing::warn!(
            roadmap_id,
            feature_id = d.feature_id,
            missing_id = d.missing_id,
            "Feature dependency does not resolve",
        );
    }
}

/* --------------------------------------------------------------------------
Roadmap CRUD
-------------------------------------------------------------------------- */

/// GET /roadmaps
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roadmaps = RoadmapRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: roadmaps }))
}

/// POST /roadmaps
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRoadmap>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.name, "Name")?;
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref status) = input.status {
        validate_roadmap_status(status)?;
    }
    validate_date_order(input.start_date, input.end_date)?;

    let roadmap = RoadmapRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(&state.pool, &caller, ACTION_CREATED, ENTITY_ROADMAP, roadmap.id, &roadmap.name)
        .await;
    tracing::info!(user_id = caller.user_id, roadmap_id = roadmap.id, "Roadmap created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: roadmap })))
}

/// GET /roadmaps/summary
pub async fn summary(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statuses = RoadmapRepo::list_statuses(&state.pool, auth.user_id).await?;
    let summary = summarize_roadmaps(statuses.iter().map(String::as_str));
    Ok(Json(DataResponse { data: summary }))
}

/// GET /roadmaps/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let roadmap = load_visible(&state.pool, id, &auth.caller()).await?;
    Ok(Json(DataResponse { data: roadmap }))
}

/// PUT /roadmaps/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoadmap>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let existing = load_owned(&state.pool, id, &caller).await?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref status) = input.status {
        validate_roadmap_status(status)?;
    }
    validate_date_order(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;

    let roadmap = RoadmapRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Roadmap",
            id,
        })?;

    activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_ROADMAP, id, &roadmap.name).await;
    tracing::info!(user_id = caller.user_id, roadmap_id = id, "Roadmap updated");

    Ok(Json(DataResponse { data: roadmap }))
}

/// DELETE /roadmaps/{id}
///
/// Removes milestones and features; tasks linked to those features are
/// kept and unlinked.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let roadmap = load_owned(&state.pool, id, &caller).await?;

    RoadmapRepo::delete(&state.pool, id).await?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_ROADMAP, id, &roadmap.name).await;
    tracing::info!(user_id = caller.user_id, roadmap_id = id, "Roadmap deleted");

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Progress and dependency graph
-------------------------------------------------------------------------- */

/// GET /roadmaps/{id}/overview
pub async fn overview(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let Some(roadmap) = load_visible(&state.pool, id, &auth.caller()).await? else {
        return Ok(Json(DataResponse { data: None }));
    };

    let features = FeatureRepo::list_for_roadmap(&state.pool, id).await?;
    let milestones = MilestoneRepo::list_for_roadmap(&state.pool, id).await?;
    let feature_statuses = || features.iter().map(|f| f.status.as_str());

    Ok(Json(DataResponse {
        data: Some(RoadmapOverview {
            roadmap,
            features: summarize_features(feature_statuses()),
            milestones: summarize_milestones(milestones.iter().map(|m| m.status.as_str())),
            progress: completion_percentage(feature_statuses()),
        }),
    }))
}

/// GET /roadmaps/{id}/dependencies
///
/// Splits the roadmap's features into ready and blocked. Dependencies that
/// no longer resolve are reported and logged.
pub async fn dependencies(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if load_visible(&state.pool, id, &auth.caller()).await?.is_none() {
        return Ok(Json(DataResponse { data: None }));
    }

    let features = FeatureRepo::list_for_roadmap(&state.pool, id).await?;
    let analysis = analyze(&feature_nodes(&features));
    warn_dangling(id, &analysis.dangling);

    Ok(Json(DataResponse {
        data: Some(analysis),
    }))
}

/// GET /roadmaps/{id}/critical-path
///
/// Longest dependency chain, or `409 DEPENDENCY_CYCLE` naming the cycle.
pub async fn critical_path_of(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if load_visible(&state.pool, id, &auth.caller()).await?.is_none() {
        return Ok(Json(DataResponse { data: None }));
    }

    let features = FeatureRepo::list_for_roadmap(&state.pool, id).await?;
    let path = critical_path(&feature_nodes(&features)).inspect_err(|e| {
        tracing::warn!(roadmap_id = id, error = %e, "Critical path rejected");
    })?;
    warn_dangling(id, &path.dangling);

    tracing::debug!(
        roadmap_id = id,
        length = path.edge_count,
        total_effort = path.total_effort,
        "Critical path computed",
    );

    Ok(Json(DataResponse { data: Some(path) }))
}

/* --------------------------------------------------------------------------
Nested milestones
-------------------------------------------------------------------------- */

/// GET /roadmaps/{id}/milestones
pub async fn list_milestones(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut data = Vec::new();
    if load_visible(&state.pool, id, &auth.caller()).await?.is_some() {
        for milestone in MilestoneRepo::list_for_roadmap(&state.pool, id).await? {
            data.push(with_progress(&state.pool, milestone).await?);
        }
    }
    Ok(Json(DataResponse { data }))
}

/// POST /roadmaps/{id}/milestones
pub async fn create_milestone(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMilestone>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    load_owned(&state.pool, id, &caller).await?;

    validate_name(&input.name, "Name")?;
    validate_description(input.description.as_deref(), "Description")?;
    if let Some(ref status) = input.status {
        validate_milestone_status(status)?;
    }

    let milestone = MilestoneRepo::create(&state.pool, caller.user_id, id, &input).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_CREATED,
        ENTITY_MILESTONE,
        milestone.id,
        &milestone.name,
    )
    .await;
    tracing::info!(
        user_id = caller.user_id,
        roadmap_id = id,
        milestone_id = milestone.id,
        "Milestone created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: milestone })))
}

/* --------------------------------------------------------------------------
Nested features
-------------------------------------------------------------------------- */

/// GET /roadmaps/{id}/features
pub async fn list_features(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let features = match load_visible(&state.pool, id, &auth.caller()).await? {
        Some(_) => FeatureRepo::list_for_roadmap(&state.pool, id).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: features }))
}

/// POST /roadmaps/{id}/features
pub async fn create_feature(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateFeature>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    load_owned(&state.pool, id, &caller).await?;

    validate_name(&input.name, "Name")?;
    validate_description(input.description.as_deref(), "Description")?;
    validate_feature_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.effort,
        input.impact,
    )?;
    validate_date_order(input.start_date, input.end_date)?;
    ensure_feature_refs(
        &state.pool,
        id,
        None,
        input.milestone_id,
        Some(&input.dependencies),
    )
    .await?;

    let feature = FeatureRepo::create(&state.pool, caller.user_id, id, &input).await?;

    activity::record(&state.pool, &caller, ACTION_CREATED, ENTITY_FEATURE, feature.id, &feature.name)
        .await;
    tracing::info!(
        user_id = caller.user_id,
        roadmap_id = id,
        feature_id = feature.id,
        dependencies = feature.dependencies.len(),
        "Feature created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: feature })))
}
