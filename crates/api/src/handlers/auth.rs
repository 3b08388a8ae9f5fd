//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{ACTION_CREATED, ENTITY_USER};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::CallerContext;
use opsdeck_core::users::{normalize_email, validate_registration};
use opsdeck_db::models::user::{CreateUser, User};
use opsdeck_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::activity;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

fn issue_token(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return an access token for it. A duplicate email
/// is rejected by `uq_users_email` with 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    let name = input.name.trim().to_string();
    validate_registration(&email, &name, &input.password)?;

    let password_hash = hash_password(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            name,
            password_hash,
        },
    )
    .await?;

    let caller = CallerContext::new(user.id);
    activity::record(&state.pool, &caller, ACTION_CREATED, ENTITY_USER, user.id, &user.name).await;
    tracing::info!(user_id = user.id, "User registered");

    let response = issue_token(&state, user)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&input.password, &user.password_hash) {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::AccessDenied(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let response = issue_token(&state, user)?;
    Ok(Json(DataResponse { data: response }))
}
