//! Route definitions for tasks and marketing campaigns.

use axum::routing::get;
use axum::Router;

use crate::handlers::{campaigns, tasks};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /            -> list (?status=&feature_id=)
/// POST   /            -> create
/// GET    /summary     -> summary
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/summary", get(tasks::summary))
        .route(
            "/{id}",
            get(tasks::get_by_id).put(tasks::update).delete(tasks::delete),
        )
}

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /            -> list (?status=)
/// POST   /            -> create
/// GET    /summary     -> summary
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn campaigns_router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list).post(campaigns::create))
        .route("/summary", get(campaigns::summary))
        .route(
            "/{id}",
            get(campaigns::get_by_id)
                .put(campaigns::update)
                .delete(campaigns::delete),
        )
}
