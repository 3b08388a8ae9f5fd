//! HTTP-level integration tests for registration, login and the profile
//! endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, put_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = json!({
        "email": "  Founder@Example.com ",
        "name": "Founder",
        "password": "long-enough-password",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();
    assert!(json["data"]["expires_in"].is_number());
    assert_eq!(json["data"]["user"]["email"], "founder@example.com");
    assert!(
        json["data"]["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );

    let me = body_json(get_auth(app, "/api/v1/users/me", &token).await).await;
    assert_eq!(me["data"]["name"], "Founder");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_registration_returns_409(pool: PgPool) {
    common::create_user_with_token(&pool, "taken@example.com").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "email": "TAKEN@example.com",
        "name": "Second",
        "password": "long-enough-password",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "a@example.com", "name": "A", "password": "short" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_correct_password_succeeds(pool: PgPool) {
    let (user, _) = common::create_user_with_token(&pool, "login@example.com").await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "login@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["user"]["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    common::create_user_with_token(&pool, "wrongpw@example.com").await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "wrongpw@example.com", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_unknown_email_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "nobody@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/users/me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_records_activity(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "profile@example.com").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/users/me",
        json!({ "name": "Renamed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Renamed");

    let activity = body_json(get_auth(app, "/api/v1/activities", &token).await).await;
    assert_eq!(activity["data"][0]["action"], "updated");
    assert_eq!(activity["data"][0]["entity_type"], "user");
}
