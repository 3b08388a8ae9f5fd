//! Route definitions for roadmaps, milestones and features.

use axum::routing::get;
use axum::Router;

use crate::handlers::{features, milestones, roadmaps};
use crate::state::AppState;

/// Routes mounted at `/roadmaps`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /summary                 -> summary
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// GET    /{id}/overview           -> overview
/// GET    /{id}/dependencies       -> dependencies
/// GET    /{id}/critical-path      -> critical_path_of
/// GET    /{id}/milestones         -> list_milestones
/// POST   /{id}/milestones         -> create_milestone
/// GET    /{id}/features           -> list_features
/// POST   /{id}/features           -> create_feature
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roadmaps::list).post(roadmaps::create))
        .route("/summary", get(roadmaps::summary))
        .route(
            "/{id}",
            get(roadmaps::get_by_id)
                .put(roadmaps::update)
                .delete(roadmaps::delete),
        )
        .route("/{id}/overview", get(roadmaps::overview))
        .route("/{id}/dependencies", get(roadmaps::dependencies))
        .route("/{id}/critical-path", get(roadmaps::critical_path_of))
        .route(
            "/{id}/milestones",
            get(roadmaps::list_milestones).post(roadmaps::create_milestone),
        )
        .route(
            "/{id}/features",
            get(roadmaps::list_features).post(roadmaps::create_feature),
        )
}

/// Routes mounted at `/milestones`.
pub fn milestones_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(milestones::get_by_id)
            .put(milestones::update)
            .delete(milestones::delete),
    )
}

/// Routes mounted at `/features`.
pub fn features_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(features::get_by_id)
            .put(features::update)
            .delete(features::delete),
    )
}
