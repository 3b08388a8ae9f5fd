//! Route definitions for customers and deals.

use axum::routing::get;
use axum::Router;

use crate::handlers::{customers, deals};
use crate::state::AppState;

/// Routes mounted at `/customers`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /summary      -> summary
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// GET    /{id}/deals   -> list_deals
/// ```
pub fn customers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route("/summary", get(customers::summary))
        .route(
            "/{id}",
            get(customers::get_by_id)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/{id}/deals", get(customers::list_deals))
}

/// Routes mounted at `/deals`.
///
/// ```text
/// GET    /             -> list (?stage=)
/// POST   /             -> create
/// GET    /pipeline     -> pipeline
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// ```
pub fn deals_router() -> Router<AppState> {
    Router::new()
        .route("/", get(deals::list).post(deals::create))
        .route("/pipeline", get(deals::pipeline))
        .route(
            "/{id}",
            get(deals::get_by_id).put(deals::update).delete(deals::delete),
        )
}
