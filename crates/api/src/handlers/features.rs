//! Handlers for the `/features/{id}` resource.
//!
//! Features are created and listed under their roadmap (see
//! `handlers::roadmaps`); reference checks shared by both paths live here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{
    ACTION_DELETED, ACTION_STATUS_CHANGED, ACTION_UPDATED, ENTITY_FEATURE,
};
use opsdeck_core::dependency_graph::newly_ready;
use opsdeck_core::error::CoreError;
use opsdeck_core::notifications::{feature_ready_message, KIND_FEATURE_READY};
use opsdeck_core::ownership::{require_owned, visible_to, CallerContext};
use opsdeck_core::roadmap::{
    validate_dependency_list, validate_feature_status, validate_priority, validate_size,
    FEATURE_STATUS_COMPLETED,
};
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_date_order, validate_description, validate_name};
use opsdeck_db::models::roadmap::{feature_nodes, Feature, UpdateFeature};
use opsdeck_db::repositories::{FeatureRepo, MilestoneRepo};
use opsdeck_db::DbPool;
use serde_json::json;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Shared checks
-------------------------------------------------------------------------- */

/// Field-level checks common to feature create and update.
pub(crate) fn validate_feature_fields(
    status: Option<&str>,
    priority: Option<&str>,
    effort: Option<i32>,
    impact: Option<i32>,
) -> AppResult<()> {
    if let Some(status) = status {
        validate_feature_status(status)?;
    }
    if let Some(priority) = priority {
        validate_priority(priority)?;
    }
    if let Some(effort) = effort {
        validate_size(effort, "Effort")?;
    }
    if let Some(impact) = impact {
        validate_size(impact, "Impact")?;
    }
    Ok(())
}

/// Check the references a feature write carries.
///
/// The milestone must belong to `roadmap_id`, and every dependency must be a
/// feature of `roadmap_id` other than the feature itself.
pub(crate) async fn ensure_feature_refs(
    pool: &DbPool,
    roadmap_id: DbId,
    feature_id: Option<DbId>,
    milestone_id: Option<DbId>,
    dependencies: Option<&[DbId]>,
) -> AppResult<()> {
    if let Some(milestone_id) = milestone_id {
        let milestone = MilestoneRepo::find_by_id(pool, milestone_id).await?;
        if milestone.map(|m| m.roadmap_id) != Some(roadmap_id) {
            return Err(CoreError::InvalidReference(format!(
                "Milestone {milestone_id} is not part of roadmap {roadmap_id}"
            ))
            .into());
        }
    }

    if let Some(dependencies) = dependencies.filter(|d| !d.is_empty()) {
        validate_dependency_list(feature_id, dependencies)?;

        let known = FeatureRepo::ids_in_roadmap(pool, roadmap_id, dependencies).await?;
        if let Some(missing) = dependencies.iter().find(|id| !known.contains(id)) {
            return Err(CoreError::InvalidReference(format!(
                "Dependency {missing} is not a feature of roadmap {roadmap_id}"
            ))
            .into());
        }
    }
    Ok(())
}

async fn load_owned(pool: &DbPool, id: DbId, caller: &CallerContext) -> AppResult<Feature> {
    let feature = FeatureRepo::find_by_id(pool, id).await?;
    Ok(require_owned(feature, id, caller)?)
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// GET /features/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let feature = visible_to(FeatureRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    Ok(Json(DataResponse { data: feature }))
}

/// PUT /features/{id}
///
/// Completing a feature notifies the caller about every feature that it was
/// the last unfinished dependency of.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFeature>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let existing = load_owned(&state.pool, id, &caller).await?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    validate_feature_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.effort,
        input.impact,
    )?;
    validate_date_order(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    let milestone_id = if input.clear_milestone {
        None
    } else {
        input.milestone_id
    };
    ensure_feature_refs(
        &state.pool,
        existing.roadmap_id,
        Some(id),
        milestone_id,
        input.dependencies.as_deref(),
    )
    .await?;

    let completing = input.status.as_deref() == Some(FEATURE_STATUS_COMPLETED)
        && existing.status != FEATURE_STATUS_COMPLETED;
    let before = if completing {
        FeatureRepo::list_for_roadmap(&state.pool, existing.roadmap_id).await?
    } else {
        Vec::new()
    };

    let feature = FeatureRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Feature",
            id,
        })?;

    if feature.status != existing.status {
        activity::record_with_details(
            &state.pool,
            &caller,
            ACTION_STATUS_CHANGED,
            ENTITY_FEATURE,
            id,
            &feature.name,
            Some(json!({ "from": existing.status, "to": feature.status })),
        )
        .await;
    } else {
        activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_FEATURE, id, &feature.name)
            .await;
    }

    if completing {
        let mut nodes = feature_nodes(&before);
        // Dependency edits in this same request count toward readiness.
        if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
            node.dependencies = feature.dependencies.clone();
        }
        let ready = newly_ready(&nodes, id);
        for ready_id in &ready {
            if let Some(ready_feature) = before.iter().find(|f| f.id == *ready_id) {
                notify::send(
                    &state.pool,
                    caller.user_id,
                    KIND_FEATURE_READY,
                    feature_ready_message(&ready_feature.name, &feature.name),
                    ENTITY_FEATURE,
                    ready_feature.id,
                )
                .await;
            }
        }
        tracing::info!(
            user_id = caller.user_id,
            feature_id = id,
            newly_ready = ready.len(),
            "Feature completed",
        );
    } else {
        tracing::info!(user_id = caller.user_id, feature_id = id, "Feature updated");
    }

    Ok(Json(DataResponse { data: feature }))
}

/// DELETE /features/{id}
///
/// Removes the feature from every dependency list and unlinks its tasks.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let feature = load_owned(&state.pool, id, &caller).await?;

    FeatureRepo::delete(&state.pool, id).await?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_FEATURE, id, &feature.name).await;
    tracing::info!(
        user_id = caller.user_id,
        feature_id = id,
        roadmap_id = feature.roadmap_id,
        "Feature deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
