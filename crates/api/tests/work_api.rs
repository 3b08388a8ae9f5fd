//! HTTP-level integration tests for tasks, campaigns, notifications and the
//! dashboard.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get_auth, post_auth, post_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(app: &Router, uri: &str, body: Value, token: &str) -> Value {
    let response = post_json_auth(app.clone(), uri, body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_summary_counts_overdue_and_hours(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "tasks@example.com").await;
    let app = common::build_test_app(pool);

    create(
        &app,
        "/api/v1/tasks",
        json!({ "title": "Ship it", "status": "done", "estimate_hours": 3.0 }),
        &token,
    )
    .await;
    create(
        &app,
        "/api/v1/tasks",
        json!({ "title": "Late", "due_date": "2000-01-01", "estimate_hours": 5.0 }),
        &token,
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/v1/tasks/summary", &token).await).await;
    assert_eq!(json["data"]["summary"]["total"], 2);
    assert_eq!(json["data"]["completion_percentage"], 50.0);
    assert_eq!(json["data"]["overdue"], 1);
    assert_eq!(json["data"]["estimated_hours_total"], 8.0);
    assert_eq!(json["data"]["estimated_hours_remaining"], 5.0);

    let done = body_json(get_auth(app, "/api/v1/tasks?status=done", &token).await).await;
    assert_eq!(done["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_cannot_link_foreign_feature(pool: PgPool) {
    let (_, owner) = common::create_user_with_token(&pool, "task-owner@example.com").await;
    let (_, other) = common::create_user_with_token(&pool, "task-other@example.com").await;
    let app = common::build_test_app(pool);

    let roadmap = create(&app, "/api/v1/roadmaps", json!({ "name": "Theirs" }), &other).await;
    let feature = create(
        &app,
        &format!("/api/v1/roadmaps/{}/features", roadmap["id"]),
        json!({ "name": "Their feature" }),
        &other,
    )
    .await;

    let response = post_json_auth(
        app,
        "/api/v1/tasks",
        json!({ "title": "Sneaky", "feature_id": feature["id"] }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn campaign_metrics_are_derived(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "campaign@example.com").await;
    let app = common::build_test_app(pool);

    let campaign = create(
        &app,
        "/api/v1/campaigns",
        json!({
            "name": "Launch",
            "channel": "email",
            "budget": 1000.0,
            "spent": 250.0,
            "leads": 50,
            "conversions": 5,
        }),
        &token,
    )
    .await;
    assert_eq!(campaign["metrics"]["budget_utilization"], 25.0);
    assert_eq!(campaign["metrics"]["conversion_rate"], 10.0);
    assert_eq!(campaign["metrics"]["cost_per_lead"], 5.0);

    let negative = post_json_auth(
        app.clone(),
        "/api/v1/campaigns",
        json!({ "name": "Broken", "budget": -1.0 }),
        &token,
    )
    .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let totals = body_json(get_auth(app, "/api/v1/campaigns/summary", &token).await).await;
    assert_eq!(totals["data"]["total_budget"], 1000.0);
    assert_eq!(totals["data"]["total_leads"], 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_can_be_read(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "inbox@example.com").await;
    let app = common::build_test_app(pool);

    let first = create(
        &app,
        "/api/v1/notifications",
        json!({ "kind": "reminder", "title": "Follow up", "message": "Call Acme" }),
        &token,
    )
    .await;
    create(
        &app,
        "/api/v1/notifications",
        json!({ "title": "FYI", "message": "Weekly digest" }),
        &token,
    )
    .await;

    let read = body_json(
        post_auth(app.clone(), &format!("/api/v1/notifications/{}/read", first["id"]), &token)
            .await,
    )
    .await;
    assert_eq!(read["data"]["is_read"], true);

    let unread = body_json(
        get_auth(app.clone(), "/api/v1/notifications?unread_only=true", &token).await,
    )
    .await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 1);
    assert_eq!(unread["data"][0]["kind"], "info");

    let marked =
        body_json(post_auth(app.clone(), "/api/v1/notifications/read-all", &token).await).await;
    assert_eq!(marked["data"]["marked"], 1);

    let count =
        body_json(get_auth(app, "/api/v1/notifications/unread-count", &token).await).await;
    assert_eq!(count["data"]["unread"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_aggregates_every_module(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "dash@example.com").await;
    let app = common::build_test_app(pool);

    create(&app, "/api/v1/ideas", json!({ "name": "Idea" }), &token).await;
    create(&app, "/api/v1/roadmaps", json!({ "name": "Plan" }), &token).await;
    create(&app, "/api/v1/tasks", json!({ "title": "Task" }), &token).await;

    let json = body_json(get_auth(app, "/api/v1/dashboard", &token).await).await;
    let data = &json["data"];
    assert_eq!(data["ideas"]["summary"]["total"], 1);
    assert_eq!(data["ideas"]["top"], json!([]));
    assert_eq!(data["roadmaps"]["total"], 1);
    assert_eq!(data["tasks"]["summary"]["total"], 1);
    assert_eq!(data["campaigns"]["summary"]["total"], 0);
    assert_eq!(data["pipeline"]["win_rate"], 0.0);
    assert_eq!(data["unread_notifications"], 0);
    assert_eq!(data["recent_activity"].as_array().unwrap().len(), 3);
}
