#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use opsdeck_api::auth::jwt::{generate_access_token, JwtConfig};
use opsdeck_api::auth::password::hash_password;
use opsdeck_api::config::ServerConfig;
use opsdeck_api::router::build_app_router;
use opsdeck_api::state::AppState;
use opsdeck_core::types::DbId;
use opsdeck_db::models::user::{CreateUser, User};
use opsdeck_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://managed-by-sqlx-test".to_string(),
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        body_limit_bytes: 64 * 1024,
        json_logs: false,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user directly and return it with a valid access token.
pub async fn create_user_with_token(pool: &PgPool, email: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = token_for(user.id);
    (user, token)
}

pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should be handled")
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, json_request("GET", uri, None, None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, Some(body))).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("GET", uri, Some(token), None)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("DELETE", uri, Some(token), None)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
