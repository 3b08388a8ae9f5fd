//! Route definitions for `/auth` and `/users`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, users};
use crate::state::AppState;

/// Routes mounted at `/auth` (public).
///
/// ```text
/// POST   /register    -> register
/// POST   /login       -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me          -> me
/// PUT    /me          -> update_me
/// ```
pub fn users_router() -> Router<AppState> {
    Router::new().route("/me", get(users::me).put(users::update_me))
}
