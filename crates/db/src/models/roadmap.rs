//! Roadmap, milestone and feature models.

use chrono::NaiveDate;
use opsdeck_core::dependency_graph::FeatureNode;
use opsdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::impl_owned;

/// A row from the `roadmaps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Roadmap {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Roadmap, "Roadmap");

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoadmap {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoadmap {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub user_id: DbId,
    pub roadmap_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Milestone, "Milestone");

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMilestone {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Defaults to `planned` if omitted.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMilestone {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// A milestone with the completion of its features.
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneWithProgress {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub feature_count: i64,
    pub completed_count: i64,
    pub progress: f64,
}

/// A row from the `features` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feature {
    pub id: DbId,
    pub user_id: DbId,
    pub roadmap_id: DbId,
    pub milestone_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub effort: i32,
    pub impact: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub dependencies: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Feature, "Feature");

impl From<&Feature> for FeatureNode {
    fn from(feature: &Feature) -> Self {
        FeatureNode {
            id: feature.id,
            status: feature.status.clone(),
            effort: feature.effort,
            dependencies: feature.dependencies.clone(),
        }
    }
}

/// Project a roadmap's features onto the dependency graph input.
pub fn feature_nodes(features: &[Feature]) -> Vec<FeatureNode> {
    features.iter().map(FeatureNode::from).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeature {
    pub name: String,
    pub description: Option<String>,
    pub milestone_id: Option<DbId>,
    /// Defaults to `planned` if omitted.
    pub status: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    pub effort: Option<i32>,
    pub impact: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub dependencies: Vec<DbId>,
}

/// DTO for updating a feature. All fields are optional.
///
/// `clear_milestone` detaches the feature from its milestone; a plain
/// `milestone_id` of `null` leaves the link unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFeature {
    pub name: Option<String>,
    pub description: Option<String>,
    pub milestone_id: Option<DbId>,
    #[serde(default)]
    pub clear_milestone: bool,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub effort: Option<i32>,
    pub impact: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub dependencies: Option<Vec<DbId>>,
}
