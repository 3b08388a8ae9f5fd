//! Liveness and database reachability, mounted outside `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub checked_at: DateTime<Utc>,
}

/// GET /health
///
/// 200 when the database answers, 503 otherwise. Load balancers only need
/// the status code; the body is for humans.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match opsdeck_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            checked_at: Utc::now(),
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
