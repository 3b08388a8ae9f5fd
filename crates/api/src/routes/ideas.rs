//! Route definitions for ideas, scoring criteria and comparisons.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{idea_comparisons, idea_criteria, ideas};
use crate::state::AppState;

/// Routes mounted at `/ideas`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /ranked                        -> ranked
/// GET    /top                           -> top
/// GET    /summary                       -> summary
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /{id}/scores                   -> list_scores
/// PUT    /{id}/scores                   -> upsert_score
/// DELETE /{id}/scores/{criterion_id}    -> delete_score
/// POST   /{id}/recalculate              -> recalculate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ideas::list).post(ideas::create))
        .route("/ranked", get(ideas::ranked))
        .route("/top", get(ideas::top))
        .route("/summary", get(ideas::summary))
        .route(
            "/{id}",
            get(ideas::get_by_id).put(ideas::update).delete(ideas::delete),
        )
        .route(
            "/{id}/scores",
            get(ideas::list_scores).put(ideas::upsert_score),
        )
        .route("/{id}/scores/{criterion_id}", delete(ideas::delete_score))
        .route("/{id}/recalculate", post(ideas::recalculate))
}

/// Routes mounted at `/idea-criteria`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// PUT    /weights     -> set_weights
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn criteria_router() -> Router<AppState> {
    Router::new()
        .route("/", get(idea_criteria::list).post(idea_criteria::create))
        .route("/weights", put(idea_criteria::set_weights))
        .route(
            "/{id}",
            put(idea_criteria::update).delete(idea_criteria::delete),
        )
}

/// Routes mounted at `/idea-comparisons`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn comparisons_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(idea_comparisons::list).post(idea_comparisons::create),
        )
        .route(
            "/{id}",
            get(idea_comparisons::get_by_id)
                .put(idea_comparisons::update)
                .delete(idea_comparisons::delete),
        )
}
