//! HTTP-level integration tests for customers, deals and the pipeline.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(app: &Router, uri: &str, body: Value, token: &str) -> Value {
    let response = post_json_auth(app.clone(), uri, body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

async fn create_customer(app: &Router, name: &str, token: &str) -> i64 {
    create(app, "/api/v1/customers", json!({ "name": name }), token).await["id"]
        .as_i64()
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn winning_a_deal_stamps_closed_at_and_notifies(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "sales@example.com").await;
    let app = common::build_test_app(pool);
    let customer = create_customer(&app, "Acme", &token).await;

    let deal = create(
        &app,
        "/api/v1/deals",
        json!({ "customer_id": customer, "title": "Annual plan", "value": 1200.0, "probability": 60 }),
        &token,
    )
    .await;
    assert!(deal["closed_at"].is_null());
    let uri = format!("/api/v1/deals/{}", deal["id"]);

    let won = body_json(put_json_auth(app.clone(), &uri, json!({ "stage": "won" }), &token).await)
        .await;
    assert_eq!(won["data"]["stage"], "won");
    assert!(won["data"]["closed_at"].is_string());

    let notifications = body_json(get_auth(app.clone(), "/api/v1/notifications", &token).await).await;
    assert_eq!(notifications["data"][0]["kind"], "deal_won");
    assert_eq!(notifications["data"][0]["entity_id"], deal["id"]);

    let reopened =
        body_json(put_json_auth(app, &uri, json!({ "stage": "negotiation" }), &token).await).await;
    assert!(reopened["data"]["closed_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deal_for_foreign_customer_is_invalid_reference(pool: PgPool) {
    let (_, owner) = common::create_user_with_token(&pool, "deal-owner@example.com").await;
    let (_, other) = common::create_user_with_token(&pool, "deal-other@example.com").await;
    let app = common::build_test_app(pool);
    let customer = create_customer(&app, "Theirs", &other).await;

    let response = post_json_auth(
        app,
        "/api/v1/deals",
        json!({ "customer_id": customer, "title": "Poached" }),
        &owner,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deal_probability_is_bounded(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "prob@example.com").await;
    let app = common::build_test_app(pool);
    let customer = create_customer(&app, "Acme", &token).await;

    let response = post_json_auth(
        app,
        "/api/v1/deals",
        json!({ "customer_id": customer, "title": "Sure thing", "probability": 140 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pipeline_weights_open_deals(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "pipeline@example.com").await;
    let app = common::build_test_app(pool);
    let customer = create_customer(&app, "Acme", &token).await;

    for (title, value, probability, stage) in [
        ("Open A", 1000.0, 50, "proposal"),
        ("Open B", 500.0, 20, "lead"),
        ("Won", 800.0, 100, "won"),
        ("Lost", 300.0, 0, "lost"),
    ] {
        create(
            &app,
            "/api/v1/deals",
            json!({
                "customer_id": customer,
                "title": title,
                "value": value,
                "probability": probability,
                "stage": stage,
            }),
            &token,
        )
        .await;
    }

    let json = body_json(get_auth(app, "/api/v1/deals/pipeline", &token).await).await;
    assert_eq!(json["data"]["open_value"], 1500.0);
    assert_eq!(json["data"]["weighted_value"], 600.0);
    assert_eq!(json["data"]["won_value"], 800.0);
    assert_eq!(json["data"]["win_rate"], 50.0);
    assert_eq!(json["data"]["summary"]["total"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_customer_removes_its_deals(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "cascade@example.com").await;
    let app = common::build_test_app(pool);
    let customer = create_customer(&app, "Short-lived", &token).await;
    let deal = create(
        &app,
        "/api/v1/deals",
        json!({ "customer_id": customer, "title": "Orphan" }),
        &token,
    )
    .await;

    let listed = body_json(
        get_auth(app.clone(), &format!("/api/v1/customers/{customer}/deals"), &token).await,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let response =
        delete_auth(app.clone(), &format!("/api/v1/customers/{customer}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone =
        body_json(get_auth(app, &format!("/api/v1/deals/{}", deal["id"]), &token).await).await;
    assert!(gone["data"].is_null());
}
