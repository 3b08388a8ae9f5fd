//! Handlers for the `/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use opsdeck_core::activity::{
    ACTION_CREATED, ACTION_DELETED, ACTION_STATUS_CHANGED, ACTION_UPDATED, ENTITY_TASK,
};
use opsdeck_core::development::{task_metrics, validate_task_status};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::{require_owned, visible_to, CallerContext};
use opsdeck_core::roadmap::validate_priority;
use opsdeck_core::types::DbId;
use opsdeck_core::validation::{validate_description, validate_name, validate_non_negative};
use opsdeck_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use opsdeck_db::repositories::{FeatureRepo, TaskRepo};
use opsdeck_db::DbPool;
use serde_json::json;

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_task_fields(
    status: Option<&str>,
    priority: Option<&str>,
    estimate_hours: Option<f64>,
) -> AppResult<()> {
    if let Some(status) = status {
        validate_task_status(status)?;
    }
    if let Some(priority) = priority {
        validate_priority(priority)?;
    }
    if let Some(hours) = estimate_hours {
        validate_non_negative(hours, "Estimate")?;
    }
    Ok(())
}

/// A task may only link to one of the caller's features.
async fn ensure_feature_link(
    pool: &DbPool,
    caller: &CallerContext,
    feature_id: Option<DbId>,
) -> AppResult<()> {
    let Some(feature_id) = feature_id else {
        return Ok(());
    };
    if visible_to(FeatureRepo::find_by_id(pool, feature_id).await?, caller).is_none() {
        return Err(
            CoreError::InvalidReference(format!("Feature {feature_id} does not exist")).into(),
        );
    }
    Ok(())
}

async fn load_owned(pool: &DbPool, id: DbId, caller: &CallerContext) -> AppResult<Task> {
    let task = TaskRepo::find_by_id(pool, id).await?;
    Ok(require_owned(task, id, caller)?)
}

/// GET /tasks?status=&feature_id=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = filter.status {
        validate_task_status(status)?;
    }
    let tasks = TaskRepo::list_for_user(&state.pool, auth.user_id, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /tasks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.title, "Title")?;
    validate_description(input.description.as_deref(), "Description")?;
    validate_task_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.estimate_hours,
    )?;
    ensure_feature_link(&state.pool, &caller, input.feature_id).await?;

    let task = TaskRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(&state.pool, &caller, ACTION_CREATED, ENTITY_TASK, task.id, &task.title).await;
    tracing::info!(user_id = caller.user_id, task_id = task.id, "Task created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /tasks/summary
///
/// Status buckets, completion, overdue count and estimate totals.
pub async fn summary(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::list_for_user(&state.pool, auth.user_id, &TaskFilter::default()).await?;
    let inputs: Vec<_> = tasks.iter().map(Task::progress_input).collect();
    let metrics = task_metrics(&inputs, Utc::now().date_naive());
    Ok(Json(DataResponse { data: metrics }))
}

/// GET /tasks/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = visible_to(TaskRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    Ok(Json(DataResponse { data: task }))
}

/// PUT /tasks/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let existing = load_owned(&state.pool, id, &caller).await?;

    if let Some(ref title) = input.title {
        validate_name(title, "Title")?;
    }
    validate_description(input.description.as_deref(), "Description")?;
    validate_task_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.estimate_hours,
    )?;
    ensure_feature_link(&state.pool, &caller, input.feature_id).await?;

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;

    if task.status != existing.status {
        activity::record_with_details(
            &state.pool,
            &caller,
            ACTION_STATUS_CHANGED,
            ENTITY_TASK,
            id,
            &task.title,
            Some(json!({ "from": existing.status, "to": task.status })),
        )
        .await;
    } else {
        activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_TASK, id, &task.title).await;
    }
    tracing::info!(user_id = caller.user_id, task_id = id, "Task updated");

    Ok(Json(DataResponse { data: task }))
}

/// DELETE /tasks/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let task = load_owned(&state.pool, id, &caller).await?;

    TaskRepo::delete(&state.pool, id).await?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_TASK, id, &task.title).await;
    tracing::info!(user_id = caller.user_id, task_id = id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
