//! Integration tests for idea scoring and its cascades.
//!
//! - Score upsert recalculates total and status in one transaction
//! - Re-scoring a criterion replaces the previous score
//! - Criterion weight changes and deletions recalculate affected ideas
//! - Deleting an idea removes its scores and scrubs comparisons

use opsdeck_core::ideas::{IDEA_STATUS_ARCHIVED, IDEA_STATUS_DRAFT, IDEA_STATUS_EVALUATED};
use opsdeck_db::models::idea::{
    CreateIdea, CreateIdeaComparison, CreateIdeaCriterion, CriterionWeight, UpdateIdea,
    UpdateIdeaCriterion, UpsertIdeaScore,
};
use opsdeck_db::models::user::CreateUser;
use opsdeck_db::repositories::{
    IdeaComparisonRepo, IdeaCriterionRepo, IdeaRepo, IdeaScoreRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Tester".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_idea(pool: &PgPool, user_id: i64, name: &str) -> i64 {
    IdeaRepo::create(
        pool,
        user_id,
        &CreateIdea {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_criterion(pool: &PgPool, user_id: i64, name: &str, weight: i32) -> i64 {
    IdeaCriterionRepo::create(
        pool,
        user_id,
        &CreateIdeaCriterion {
            name: name.to_string(),
            description: None,
            weight: Some(weight),
            sort_order: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn score(criterion_id: i64, score: i32) -> UpsertIdeaScore {
    UpsertIdeaScore {
        criterion_id,
        score,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Recalculation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weighted_total_and_evaluation(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "Dark mode").await;
    let impact = new_criterion(&pool, user, "Impact", 8).await;
    let effort = new_criterion(&pool, user, "Effort", 4).await;

    let first = IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 9))
        .await
        .unwrap();
    assert_eq!(first.idea.total_score, Some(9.0));
    assert_eq!(first.idea.status, IDEA_STATUS_DRAFT);
    assert!(!first.status_changed());

    let second = IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(effort, 5))
        .await
        .unwrap();
    assert_eq!(second.idea.total_score, Some(7.67));
    assert_eq!(second.idea.status, IDEA_STATUS_EVALUATED);
    assert!(second.status_changed());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rescore_replaces_previous_value(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "Exports").await;
    let impact = new_criterion(&pool, user, "Impact", 5).await;

    IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 3))
        .await
        .unwrap();
    let outcome = IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 6))
        .await
        .unwrap();

    let scores = IdeaScoreRepo::list_for_idea(&pool, idea).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].score, 6);
    assert_eq!(outcome.idea.total_score, Some(6.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_last_score_returns_to_draft(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "Webhooks").await;
    let impact = new_criterion(&pool, user, "Impact", 5).await;

    IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 7))
        .await
        .unwrap();
    let outcome = IdeaScoreRepo::delete_and_recalculate(&pool, idea, impact)
        .await
        .unwrap()
        .expect("score existed");

    assert_eq!(outcome.idea.total_score, None);
    assert_eq!(outcome.idea.status, IDEA_STATUS_DRAFT);

    let missing = IdeaScoreRepo::delete_and_recalculate(&pool, idea, impact)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archived_idea_keeps_status(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "Legacy import").await;
    let impact = new_criterion(&pool, user, "Impact", 5).await;

    IdeaRepo::update(
        &pool,
        idea,
        &UpdateIdea {
            name: None,
            description: None,
            status: Some(IDEA_STATUS_ARCHIVED.to_string()),
        },
    )
    .await
    .unwrap();

    let outcome = IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 4))
        .await
        .unwrap();
    assert_eq!(outcome.idea.status, IDEA_STATUS_ARCHIVED);
    assert_eq!(outcome.idea.total_score, Some(4.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weight_change_recalculates_scored_ideas(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "SSO").await;
    let other = new_idea(&pool, user, "Unscored").await;
    let impact = new_criterion(&pool, user, "Impact", 5).await;
    let effort = new_criterion(&pool, user, "Effort", 5).await;

    IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 9))
        .await
        .unwrap();
    let before = IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(effort, 5))
        .await
        .unwrap();
    assert_eq!(before.idea.total_score, Some(7.0));

    let (criterion, recalculated) = IdeaCriterionRepo::update(
        &pool,
        impact,
        &UpdateIdeaCriterion {
            name: None,
            description: None,
            weight: Some(8),
            sort_order: None,
        },
    )
    .await
    .unwrap()
    .expect("criterion exists");
    assert_eq!(criterion.weight, 8);
    assert_eq!(recalculated.len(), 1);
    assert_eq!(recalculated[0].id, idea);
    // (9*8 + 5*5) / 13
    assert_eq!(recalculated[0].total_score, Some(7.46));

    let untouched = IdeaRepo::find_by_id(&pool, other).await.unwrap().unwrap();
    assert_eq!(untouched.total_score, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_weights_skip_foreign_criteria(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let stranger = new_user(&pool, "stranger@example.com").await;
    let mine = new_criterion(&pool, owner, "Impact", 5).await;
    let theirs = new_criterion(&pool, stranger, "Reach", 5).await;

    let (updated, _) = IdeaCriterionRepo::set_weights(
        &pool,
        owner,
        &[
            CriterionWeight {
                criterion_id: mine,
                weight: 9,
            },
            CriterionWeight {
                criterion_id: theirs,
                weight: 1,
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].id, mine);
    let foreign = IdeaCriterionRepo::find_by_id(&pool, theirs)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(foreign.weight, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_criterion_delete_recalculates(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "Billing").await;
    let impact = new_criterion(&pool, user, "Impact", 8).await;
    let effort = new_criterion(&pool, user, "Effort", 4).await;

    IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 9))
        .await
        .unwrap();
    IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(effort, 5))
        .await
        .unwrap();

    let recalculated = IdeaCriterionRepo::delete(&pool, effort)
        .await
        .unwrap()
        .expect("criterion existed");
    assert_eq!(recalculated.len(), 1);
    assert_eq!(recalculated[0].total_score, Some(9.0));

    let scores = IdeaScoreRepo::list_for_idea(&pool, idea).await.unwrap();
    assert_eq!(scores.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_unscored_criterion_evaluates_complete_drafts(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let idea = new_idea(&pool, user, "Usage-based pricing").await;
    let untouched = new_idea(&pool, user, "Unscored idea").await;
    let impact = new_criterion(&pool, user, "Impact", 6).await;
    let reach = new_criterion(&pool, user, "Reach", 6).await;
    let risk = new_criterion(&pool, user, "Risk", 3).await;

    IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(impact, 8))
        .await
        .unwrap();
    let partial = IdeaScoreRepo::upsert_and_recalculate(&pool, user, idea, &score(reach, 6))
        .await
        .unwrap();
    assert_eq!(partial.idea.status, IDEA_STATUS_DRAFT);

    let recalculated = IdeaCriterionRepo::delete(&pool, risk)
        .await
        .unwrap()
        .expect("criterion existed");
    assert_eq!(recalculated.len(), 1);
    assert_eq!(recalculated[0].id, idea);
    assert_eq!(recalculated[0].status, IDEA_STATUS_EVALUATED);
    assert_eq!(recalculated[0].total_score, Some(7.0));

    let untouched = IdeaRepo::find_by_id(&pool, untouched).await.unwrap().unwrap();
    assert_eq!(untouched.status, IDEA_STATUS_DRAFT);

    assert!(IdeaCriterionRepo::delete(&pool, risk).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Idea delete cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_idea_delete_removes_scores_and_scrubs_comparisons(pool: PgPool) {
    let user = new_user(&pool, "owner@example.com").await;
    let doomed = new_idea(&pool, user, "Doomed").await;
    let kept = new_idea(&pool, user, "Kept").await;
    let impact = new_criterion(&pool, user, "Impact", 5).await;

    IdeaScoreRepo::upsert_and_recalculate(&pool, user, doomed, &score(impact, 8))
        .await
        .unwrap();
    let comparison = IdeaComparisonRepo::create(
        &pool,
        user,
        &CreateIdeaComparison {
            name: "Q3 candidates".to_string(),
            notes: None,
            idea_ids: vec![doomed, kept],
        },
    )
    .await
    .unwrap();

    assert!(IdeaRepo::delete(&pool, doomed).await.unwrap());

    let scores = IdeaScoreRepo::list_for_idea(&pool, doomed).await.unwrap();
    assert!(scores.is_empty());

    let comparison = IdeaComparisonRepo::find_by_id(&pool, comparison.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(comparison.idea_ids, vec![kept]);

    assert!(!IdeaRepo::delete(&pool, doomed).await.unwrap());
}
