//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": <message>, "code": <CODE>}`.
//! Internal failures are logged in full and reach the client only as
//! [`INTERNAL_MESSAGE`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use opsdeck_core::error::CoreError;
use serde::Serialize;

/// The only text a client sees for a 500.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input that never reached domain validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

type Classified = (StatusCode, &'static str, String);

fn internal(source: &dyn std::fmt::Display) -> Classified {
    tracing::error!(error = %source, "Request failed with an internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn classify_core(err: &CoreError) -> Classified {
    let (status, code) = match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CoreError::AccessDenied(_) => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
        CoreError::InvalidReference(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REFERENCE"),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        CoreError::DependencyCycle { .. } => (StatusCode::CONFLICT, "DEPENDENCY_CYCLE"),
        CoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        CoreError::Internal(msg) => return internal(msg),
    };
    let message = match err {
        CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
        CoreError::AccessDenied(msg)
        | CoreError::InvalidReference(msg)
        | CoreError::Validation(msg)
        | CoreError::Conflict(msg)
        | CoreError::Unauthorized(msg) => msg.clone(),
        other => other.to_string(),
    };
    (status, code, message)
}

/// Map a sqlx failure onto the API's error codes.
///
/// Constraint names carry their meaning by prefix: `uq_` is a duplicate
/// (409), `fk_` a dangling reference (422), `ck_` a rejected value (400).
/// Anything else is internal.
fn classify_sqlx(err: &sqlx::Error) -> Classified {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => return internal(other),
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match (db_err.code().as_deref(), constraint.split('_').next()) {
        (Some("23505"), Some("uq")) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        (Some("23503"), Some("fk")) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_REFERENCE",
            format!("Referenced record does not exist: {constraint}"),
        ),
        (Some("23514"), Some("ck")) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            format!("Value violates check constraint: {constraint}"),
        ),
        _ => internal(db_err),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Core(core) => classify_core(core),
            AppError::Database(err) => classify_sqlx(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };
        (status, Json(ErrorBody { error, code })).into_response()
    }
}
