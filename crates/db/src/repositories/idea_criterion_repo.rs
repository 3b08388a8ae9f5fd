//! Repository for the `idea_criteria` table.
//!
//! Weight changes and deletions alter the totals of every idea scored against
//! the criterion, so those writes recalculate the affected ideas in the same
//! transaction. A deletion can also leave a partly scored draft idea with
//! every remaining criterion scored, so it recalculates the owner's scored
//! drafts as well.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::idea::{
    CreateIdeaCriterion, CriterionWeight, Idea, IdeaCriterion, UpdateIdeaCriterion,
};
use crate::repositories::idea_score_repo::IdeaScoreRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, name, description, weight, sort_order, created_at, updated_at";

/// Weight applied when a criterion is created without one.
pub const DEFAULT_WEIGHT: i32 = 5;

/// Provides CRUD operations for scoring criteria.
pub struct IdeaCriterionRepo;

impl IdeaCriterionRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateIdeaCriterion,
    ) -> Result<IdeaCriterion, sqlx::Error> {
        let query = format!(
            "INSERT INTO idea_criteria (user_id, name, description, weight, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, {DEFAULT_WEIGHT}), COALESCE($5, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IdeaCriterion>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.weight)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IdeaCriterion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM idea_criteria WHERE id = $1");
        sqlx::query_as::<_, IdeaCriterion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<IdeaCriterion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM idea_criteria WHERE user_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, IdeaCriterion>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a criterion. When the weight changes, every idea scored against
    /// it is recalculated before commit.
    ///
    /// Returns `None` if no row with the given `id` exists, otherwise the
    /// criterion and the ideas that were recalculated.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIdeaCriterion,
    ) -> Result<Option<(IdeaCriterion, Vec<Idea>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous_weight: Option<i32> =
            sqlx::query_scalar("SELECT weight FROM idea_criteria WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous_weight) = previous_weight else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE idea_criteria SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                weight = COALESCE($4, weight),
                sort_order = COALESCE($5, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let criterion = sqlx::query_as::<_, IdeaCriterion>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.weight)
            .bind(input.sort_order)
            .fetch_one(&mut *tx)
            .await?;

        let recalculated = if criterion.weight != previous_weight {
            let idea_ids = Self::scored_idea_ids_inner(&mut tx, &[id]).await?;
            Self::recalculate_all_inner(&mut tx, &idea_ids).await?
        } else {
            Vec::new()
        };

        tx.commit().await?;
        Ok(Some((criterion, recalculated)))
    }

    /// Apply several weight changes at once and recalculate every idea scored
    /// against any of them, in a single transaction.
    ///
    /// Only criteria owned by `user_id` are touched; the caller validates
    /// ownership and ranges beforehand.
    pub async fn set_weights(
        pool: &PgPool,
        user_id: DbId,
        weights: &[CriterionWeight],
    ) -> Result<(Vec<IdeaCriterion>, Vec<Idea>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE idea_criteria SET weight = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let mut criteria = Vec::with_capacity(weights.len());
        for entry in weights {
            let updated = sqlx::query_as::<_, IdeaCriterion>(&query)
                .bind(entry.criterion_id)
                .bind(user_id)
                .bind(entry.weight)
                .fetch_optional(&mut *tx)
                .await?;
            criteria.extend(updated);
        }

        let criterion_ids: Vec<DbId> = criteria.iter().map(|c| c.id).collect();
        let idea_ids = Self::scored_idea_ids_inner(&mut tx, &criterion_ids).await?;
        let recalculated = Self::recalculate_all_inner(&mut tx, &idea_ids).await?;

        tx.commit().await?;
        Ok((criteria, recalculated))
    }

    /// Delete a criterion with its scores and recalculate the ideas that had
    /// been scored against it, plus the owner's scored `draft` ideas, which
    /// may now have a score for every remaining criterion.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<Idea>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owner_id: Option<DbId> =
            sqlx::query_scalar("SELECT user_id FROM idea_criteria WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(owner_id) = owner_id else {
            return Ok(None);
        };

        let mut idea_ids = Self::scored_idea_ids_inner(&mut tx, &[id]).await?;

        sqlx::query("DELETE FROM idea_scores WHERE criterion_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM idea_criteria WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let drafts: Vec<DbId> = sqlx::query_scalar(
            "SELECT DISTINCT i.id FROM ideas i
             JOIN idea_scores s ON s.idea_id = i.id
             WHERE i.user_id = $1 AND i.status = 'draft'",
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;
        idea_ids.extend(drafts);
        idea_ids.sort_unstable();
        idea_ids.dedup();

        let recalculated = Self::recalculate_all_inner(&mut tx, &idea_ids).await?;
        tx.commit().await?;
        Ok(Some(recalculated))
    }

    async fn scored_idea_ids_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        criterion_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT idea_id FROM idea_scores
             WHERE criterion_id = ANY($1)
             ORDER BY idea_id",
        )
        .bind(criterion_ids)
        .fetch_all(&mut **tx)
        .await
    }

    async fn recalculate_all_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        idea_ids: &[DbId],
    ) -> Result<Vec<Idea>, sqlx::Error> {
        let mut ideas = Vec::with_capacity(idea_ids.len());
        for &idea_id in idea_ids {
            let (idea, _) = IdeaScoreRepo::recalculate_inner(tx, idea_id).await?;
            ideas.push(idea);
        }
        Ok(ideas)
    }
}
