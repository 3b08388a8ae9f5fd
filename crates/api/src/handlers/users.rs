//! Handlers for the `/users/me` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{ACTION_UPDATED, ENTITY_USER};
use opsdeck_core::error::CoreError;
use opsdeck_core::validation::validate_name;
use opsdeck_db::models::user::UpdateUser;
use opsdeck_db::repositories::UserRepo;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }

    let user = UserRepo::update(&state.pool, caller.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: caller.user_id,
        }))?;

    activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_USER, user.id, &user.name).await;
    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(DataResponse { data: user }))
}
