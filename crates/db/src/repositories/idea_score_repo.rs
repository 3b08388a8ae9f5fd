//! Repository for the `idea_scores` table and idea total recalculation.
//!
//! Every write that can change an idea's total (score upsert, score delete)
//! re-sums the full score set inside the same transaction and applies the
//! resulting status transition.

use opsdeck_core::ideas::status_after_scoring;
use opsdeck_core::scoring::{total_score, WeightedScore};
use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::idea::{Idea, IdeaScore, ScoringOutcome, UpsertIdeaScore, WeightedScoreRow};
use crate::repositories::idea_repo::COLUMNS as IDEA_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, idea_id, criterion_id, score, notes, created_at, updated_at";

/// Provides score writes and the transactional recalculation they trigger.
pub struct IdeaScoreRepo;

impl IdeaScoreRepo {
    /// List the scores of one idea ordered by criterion.
    pub async fn list_for_idea(pool: &PgPool, idea_id: DbId) -> Result<Vec<IdeaScore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM idea_scores WHERE idea_id = $1 ORDER BY criterion_id"
        );
        sqlx::query_as::<_, IdeaScore>(&query)
            .bind(idea_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the score of one criterion on an idea, then
    /// recalculate the idea's total and status in the same transaction.
    pub async fn upsert_and_recalculate(
        pool: &PgPool,
        user_id: DbId,
        idea_id: DbId,
        input: &UpsertIdeaScore,
    ) -> Result<ScoringOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO idea_scores (user_id, idea_id, criterion_id, score, notes)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_idea_scores_idea_criterion
             DO UPDATE SET score = EXCLUDED.score, notes = EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        let score = sqlx::query_as::<_, IdeaScore>(&query)
            .bind(user_id)
            .bind(idea_id)
            .bind(input.criterion_id)
            .bind(input.score)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        let (idea, previous_status) = Self::recalculate_inner(&mut tx, idea_id).await?;
        tx.commit().await?;

        Ok(ScoringOutcome {
            score: Some(score),
            idea,
            previous_status,
        })
    }

    /// Remove the score of one criterion on an idea and recalculate.
    ///
    /// Returns `None` if there was no such score.
    pub async fn delete_and_recalculate(
        pool: &PgPool,
        idea_id: DbId,
        criterion_id: DbId,
    ) -> Result<Option<ScoringOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM idea_scores WHERE idea_id = $1 AND criterion_id = $2")
            .bind(idea_id)
            .bind(criterion_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let (idea, previous_status) = Self::recalculate_inner(&mut tx, idea_id).await?;
        tx.commit().await?;

        Ok(Some(ScoringOutcome {
            score: None,
            idea,
            previous_status,
        }))
    }

    /// Re-sum an idea's scores without changing any of them.
    pub async fn recalculate(pool: &PgPool, idea_id: DbId) -> Result<ScoringOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let (idea, previous_status) = Self::recalculate_inner(&mut tx, idea_id).await?;
        tx.commit().await?;

        Ok(ScoringOutcome {
            score: None,
            idea,
            previous_status,
        })
    }

    /// Recompute total and status for one idea inside an open transaction.
    ///
    /// The idea row is locked for the duration so concurrent recalculations
    /// of the same idea serialize. Returns the updated idea and the status it
    /// held before.
    pub(crate) async fn recalculate_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        idea_id: DbId,
    ) -> Result<(Idea, String), sqlx::Error> {
        let (owner_id, previous_status): (DbId, String) =
            sqlx::query_as("SELECT user_id, status FROM ideas WHERE id = $1 FOR UPDATE")
                .bind(idea_id)
                .fetch_one(&mut **tx)
                .await?;

        let rows = sqlx::query_as::<_, WeightedScoreRow>(
            "SELECT s.criterion_id, s.score, c.weight
             FROM idea_scores s
             JOIN idea_criteria c ON c.id = s.criterion_id
             WHERE s.idea_id = $1",
        )
        .bind(idea_id)
        .fetch_all(&mut **tx)
        .await?;

        let criteria_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM idea_criteria WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(&mut **tx)
                .await?;

        let weighted: Vec<WeightedScore> = rows
            .iter()
            .map(|r| WeightedScore::new(r.weight, r.score))
            .collect();
        let total = total_score(&weighted);
        let status = status_after_scoring(&previous_status, rows.len(), criteria_count as usize);

        let query = format!(
            "UPDATE ideas SET total_score = $2, status = $3
             WHERE id = $1
             RETURNING {IDEA_COLUMNS}"
        );
        let idea = sqlx::query_as::<_, Idea>(&query)
            .bind(idea_id)
            .bind(total)
            .bind(status)
            .fetch_one(&mut **tx)
            .await?;

        tracing::debug!(
            idea_id,
            scores = rows.len(),
            criteria = criteria_count,
            total_score = ?idea.total_score,
            status = %idea.status,
            "Idea recalculated",
        );

        Ok((idea, previous_status))
    }
}
