//! Integration tests for roadmap, milestone and feature cascades.

use opsdeck_core::dependency_graph::{analyze, critical_path};
use opsdeck_db::models::roadmap::{
    feature_nodes, CreateFeature, CreateMilestone, CreateRoadmap, UpdateFeature,
};
use opsdeck_db::models::sales::{CreateCustomer, CreateDeal, UpdateDeal};
use opsdeck_db::models::task::{CreateTask, TaskFilter};
use opsdeck_db::models::user::CreateUser;
use opsdeck_db::repositories::{
    CustomerRepo, DealRepo, FeatureRepo, MilestoneRepo, RoadmapRepo, TaskRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: "planner@example.com".to_string(),
            name: "Planner".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_roadmap(pool: &PgPool, user_id: i64) -> i64 {
    RoadmapRepo::create(
        pool,
        user_id,
        &CreateRoadmap {
            name: "2026".to_string(),
            description: None,
            status: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_feature(name: &str, milestone_id: Option<i64>, dependencies: Vec<i64>) -> CreateFeature {
    CreateFeature {
        name: name.to_string(),
        description: None,
        milestone_id,
        status: None,
        priority: None,
        effort: Some(2),
        impact: None,
        start_date: None,
        end_date: None,
        dependencies,
    }
}

fn status_only(status: &str) -> UpdateFeature {
    UpdateFeature {
        name: None,
        description: None,
        milestone_id: None,
        clear_milestone: false,
        status: Some(status.to_string()),
        priority: None,
        effort: None,
        impact: None,
        start_date: None,
        end_date: None,
        dependencies: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_milestone_delete_clears_feature_refs(pool: PgPool) {
    let user = new_user(&pool).await;
    let roadmap = new_roadmap(&pool, user).await;
    let milestone = MilestoneRepo::create(
        &pool,
        user,
        roadmap,
        &CreateMilestone {
            name: "Beta".to_string(),
            description: None,
            due_date: None,
            status: None,
        },
    )
    .await
    .unwrap();

    let a = FeatureRepo::create(&pool, user, roadmap, &new_feature("A", Some(milestone.id), vec![]))
        .await
        .unwrap();
    let b = FeatureRepo::create(&pool, user, roadmap, &new_feature("B", Some(milestone.id), vec![]))
        .await
        .unwrap();

    let detached = MilestoneRepo::delete(&pool, milestone.id).await.unwrap();
    assert_eq!(detached, Some(2));

    for id in [a.id, b.id] {
        let feature = FeatureRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(feature.milestone_id, None);
    }
    assert!(MilestoneRepo::find_by_id(&pool, milestone.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(MilestoneRepo::delete(&pool, milestone.id).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_milestone_progress_counts_completed(pool: PgPool) {
    let user = new_user(&pool).await;
    let roadmap = new_roadmap(&pool, user).await;
    let milestone = MilestoneRepo::create(
        &pool,
        user,
        roadmap,
        &CreateMilestone {
            name: "GA".to_string(),
            description: None,
            due_date: None,
            status: None,
        },
    )
    .await
    .unwrap();
    let a = FeatureRepo::create(&pool, user, roadmap, &new_feature("A", Some(milestone.id), vec![]))
        .await
        .unwrap();
    FeatureRepo::create(&pool, user, roadmap, &new_feature("B", Some(milestone.id), vec![]))
        .await
        .unwrap();
    FeatureRepo::update(&pool, a.id, &status_only("completed"))
        .await
        .unwrap();

    let (total, completed) = MilestoneRepo::feature_progress(&pool, milestone.id)
        .await
        .unwrap();
    assert_eq!((total, completed), (2, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feature_delete_scrubs_dependencies_and_unlinks_tasks(pool: PgPool) {
    let user = new_user(&pool).await;
    let roadmap = new_roadmap(&pool, user).await;
    let base = FeatureRepo::create(&pool, user, roadmap, &new_feature("Base", None, vec![]))
        .await
        .unwrap();
    let top = FeatureRepo::create(&pool, user, roadmap, &new_feature("Top", None, vec![base.id]))
        .await
        .unwrap();
    let task = TaskRepo::create(
        &pool,
        user,
        &CreateTask {
            title: "Schema".to_string(),
            description: None,
            feature_id: Some(base.id),
            status: None,
            priority: None,
            estimate_hours: Some(3.0),
            due_date: None,
        },
    )
    .await
    .unwrap();

    assert!(FeatureRepo::delete(&pool, base.id).await.unwrap());

    let top = FeatureRepo::find_by_id(&pool, top.id).await.unwrap().unwrap();
    assert!(top.dependencies.is_empty());
    let task = TaskRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(task.feature_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clear_milestone_on_update(pool: PgPool) {
    let user = new_user(&pool).await;
    let roadmap = new_roadmap(&pool, user).await;
    let milestone = MilestoneRepo::create(
        &pool,
        user,
        roadmap,
        &CreateMilestone {
            name: "Alpha".to_string(),
            description: None,
            due_date: None,
            status: None,
        },
    )
    .await
    .unwrap();
    let feature =
        FeatureRepo::create(&pool, user, roadmap, &new_feature("A", Some(milestone.id), vec![]))
            .await
            .unwrap();

    let mut patch = status_only("in_progress");
    patch.clear_milestone = true;
    let updated = FeatureRepo::update(&pool, feature.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.milestone_id, None);
    assert_eq!(updated.status, "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_graph_over_stored_features(pool: PgPool) {
    let user = new_user(&pool).await;
    let roadmap = new_roadmap(&pool, user).await;
    let a = FeatureRepo::create(&pool, user, roadmap, &new_feature("A", None, vec![]))
        .await
        .unwrap();
    let b = FeatureRepo::create(&pool, user, roadmap, &new_feature("B", None, vec![a.id]))
        .await
        .unwrap();
    let c = FeatureRepo::create(&pool, user, roadmap, &new_feature("C", None, vec![b.id]))
        .await
        .unwrap();

    let features = FeatureRepo::list_for_roadmap(&pool, roadmap).await.unwrap();
    let nodes = feature_nodes(&features);

    let analysis = analyze(&nodes);
    assert_eq!(analysis.ready, vec![a.id]);
    assert_eq!(analysis.blocked.len(), 2);

    let path = critical_path(&nodes).unwrap();
    assert_eq!(path.features, vec![a.id, b.id, c.id]);
    assert_eq!(path.edge_count, 2);
    assert_eq!(path.total_effort, 6);

    let known = FeatureRepo::ids_in_roadmap(&pool, roadmap, &[a.id, 9_999_999])
        .await
        .unwrap();
    assert_eq!(known, vec![a.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roadmap_delete_cascades(pool: PgPool) {
    let user = new_user(&pool).await;
    let roadmap = new_roadmap(&pool, user).await;
    let feature = FeatureRepo::create(&pool, user, roadmap, &new_feature("A", None, vec![]))
        .await
        .unwrap();
    let task = TaskRepo::create(
        &pool,
        user,
        &CreateTask {
            title: "Wire up".to_string(),
            description: None,
            feature_id: Some(feature.id),
            status: None,
            priority: None,
            estimate_hours: None,
            due_date: None,
        },
    )
    .await
    .unwrap();

    assert!(RoadmapRepo::delete(&pool, roadmap).await.unwrap());
    assert!(FeatureRepo::find_by_id(&pool, feature.id)
        .await
        .unwrap()
        .is_none());

    let tasks = TaskRepo::list_for_user(&pool, user, &TaskFilter::default())
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].feature_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_delete_removes_deals(pool: PgPool) {
    let user = new_user(&pool).await;
    let customer = CustomerRepo::create(
        &pool,
        user,
        &CreateCustomer {
            name: "Acme".to_string(),
            email: None,
            company: None,
            status: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    let deal = DealRepo::create(
        &pool,
        user,
        &CreateDeal {
            customer_id: customer.id,
            title: "Annual plan".to_string(),
            value: Some(12_000.0),
            stage: Some("won".to_string()),
            probability: Some(100),
            expected_close_date: None,
        },
    )
    .await
    .unwrap();
    assert!(deal.closed_at.is_some());

    assert_eq!(CustomerRepo::delete(&pool, customer.id).await.unwrap(), Some(1));
    assert!(DealRepo::find_by_id(&pool, deal.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_closed_at_restamped_between_won_and_lost(pool: PgPool) {
    let user = new_user(&pool).await;
    let customer = CustomerRepo::create(
        &pool,
        user,
        &CreateCustomer {
            name: "Globex".to_string(),
            email: None,
            company: None,
            status: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    let deal = DealRepo::create(
        &pool,
        user,
        &CreateDeal {
            customer_id: customer.id,
            title: "Pilot".to_string(),
            value: Some(3_000.0),
            stage: Some("won".to_string()),
            probability: Some(100),
            expected_close_date: None,
        },
    )
    .await
    .unwrap();

    sqlx::query("UPDATE deals SET closed_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(deal.id)
        .execute(&pool)
        .await
        .unwrap();
    let won_at = DealRepo::find_by_id(&pool, deal.id)
        .await
        .unwrap()
        .unwrap()
        .closed_at
        .unwrap();

    let stage = |stage: Option<&str>, title: Option<&str>| UpdateDeal {
        title: title.map(str::to_string),
        value: None,
        stage: stage.map(str::to_string),
        probability: None,
        expected_close_date: None,
    };

    let lost = DealRepo::update(&pool, deal.id, &stage(Some("lost"), None))
        .await
        .unwrap()
        .unwrap();
    let lost_at = lost.closed_at.unwrap();
    assert!(lost_at > won_at);

    let renamed = DealRepo::update(&pool, deal.id, &stage(None, Some("Pilot (lost)")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.closed_at, Some(lost_at));

    let same_stage = DealRepo::update(&pool, deal.id, &stage(Some("lost"), None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(same_stage.closed_at, Some(lost_at));
}
