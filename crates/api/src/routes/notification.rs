//! Route definitions for notifications, the activity log and the dashboard.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{activities, dashboard, notifications};
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /unread-count    -> unread_count
/// POST   /read-all        -> mark_all_read
/// POST   /{id}/read       -> mark_read
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list).post(notifications::create))
        .route("/unread-count", get(notifications::unread_count))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/{id}", delete(notifications::delete))
}

/// Routes mounted at `/activities`.
///
/// ```text
/// GET    /                       -> recent
/// GET    /{entity_type}/{id}     -> for_entity
/// ```
pub fn activities_router() -> Router<AppState> {
    Router::new()
        .route("/", get(activities::recent))
        .route("/{entity_type}/{id}", get(activities::for_entity))
}

/// Routes mounted at `/dashboard`.
pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::overview))
}
