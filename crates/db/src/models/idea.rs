//! Idea scoring models: ideas, criteria, scores and comparisons.

use opsdeck_core::ranking::Rankable;
use opsdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::impl_owned;

/// A row from the `ideas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Idea {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    /// `None` until the idea has at least one score.
    pub total_score: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Idea, "Idea");

impl Rankable for Idea {
    fn rank_id(&self) -> DbId {
        self.id
    }

    fn rank_score(&self) -> Option<f64> {
        self.total_score
    }

    fn rank_created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIdea {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an idea. All fields are optional.
///
/// `status` may be set explicitly (e.g. to archive an idea); scoring only
/// moves it between `draft` and `evaluated`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIdea {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// A row from the `idea_criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IdeaCriterion {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub weight: i32,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(IdeaCriterion, "Criterion");

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIdeaCriterion {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 5 if omitted.
    pub weight: Option<i32>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIdeaCriterion {
    pub name: Option<String>,
    pub description: Option<String>,
    pub weight: Option<i32>,
    pub sort_order: Option<i32>,
}

/// One entry of a bulk weight change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CriterionWeight {
    pub criterion_id: DbId,
    pub weight: i32,
}

/// A row from the `idea_scores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IdeaScore {
    pub id: DbId,
    pub user_id: DbId,
    pub idea_id: DbId,
    pub criterion_id: DbId,
    pub score: i32,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording (or replacing) one criterion score on an idea.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertIdeaScore {
    pub criterion_id: DbId,
    pub score: i32,
    pub notes: Option<String>,
}

/// Score joined with the weight of its criterion, used for aggregation.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct WeightedScoreRow {
    pub criterion_id: DbId,
    pub score: i32,
    pub weight: i32,
}

/// Result of a scoring write: the affected score (absent on delete) and the
/// idea after its total and status were recalculated.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringOutcome {
    pub score: Option<IdeaScore>,
    pub idea: Idea,
    pub previous_status: String,
}

impl ScoringOutcome {
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.idea.status
    }
}

/// A row from the `idea_comparisons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IdeaComparison {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub notes: Option<String>,
    pub idea_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(IdeaComparison, "Comparison");

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIdeaComparison {
    pub name: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub idea_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIdeaComparison {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub idea_ids: Option<Vec<DbId>>,
}

/// A comparison with its ideas resolved and ranked.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonWithIdeas {
    #[serde(flatten)]
    pub comparison: IdeaComparison,
    pub ideas: Vec<Idea>,
}

