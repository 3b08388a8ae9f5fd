//! Roadmap, milestone, and feature vocabularies and validation.

use crate::error::CoreError;
use crate::ratio::percent_of;
use crate::status_summary::{summarize, StatusSummary};
use crate::types::DbId;
use crate::validation::{validate_int_range, validate_one_of};

/* --------------------------------------------------------------------------
Roadmap statuses
-------------------------------------------------------------------------- */

pub const ROADMAP_STATUS_DRAFT: &str = "draft";
pub const ROADMAP_STATUS_ACTIVE: &str = "active";
pub const ROADMAP_STATUS_COMPLETED: &str = "completed";
pub const ROADMAP_STATUS_ARCHIVED: &str = "archived";

pub const VALID_ROADMAP_STATUSES: &[&str] = &[
    ROADMAP_STATUS_DRAFT,
    ROADMAP_STATUS_ACTIVE,
    ROADMAP_STATUS_COMPLETED,
    ROADMAP_STATUS_ARCHIVED,
];

/* --------------------------------------------------------------------------
Milestone statuses
-------------------------------------------------------------------------- */

pub const MILESTONE_STATUS_PLANNED: &str = "planned";
pub const MILESTONE_STATUS_IN_PROGRESS: &str = "in_progress";
pub const MILESTONE_STATUS_COMPLETED: &str = "completed";
pub const MILESTONE_STATUS_MISSED: &str = "missed";

pub const VALID_MILESTONE_STATUSES: &[&str] = &[
    MILESTONE_STATUS_PLANNED,
    MILESTONE_STATUS_IN_PROGRESS,
    MILESTONE_STATUS_COMPLETED,
    MILESTONE_STATUS_MISSED,
];

/* --------------------------------------------------------------------------
Feature statuses, priorities, sizing
-------------------------------------------------------------------------- */

pub const FEATURE_STATUS_PLANNED: &str = "planned";
pub const FEATURE_STATUS_IN_PROGRESS: &str = "in_progress";
pub const FEATURE_STATUS_COMPLETED: &str = "completed";
pub const FEATURE_STATUS_ON_HOLD: &str = "on_hold";

pub const VALID_FEATURE_STATUSES: &[&str] = &[
    FEATURE_STATUS_PLANNED,
    FEATURE_STATUS_IN_PROGRESS,
    FEATURE_STATUS_COMPLETED,
    FEATURE_STATUS_ON_HOLD,
];

/// Priority levels shared by features and tasks.
pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

/// Default priority when none is supplied.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Effort and impact are sized on a 1-10 scale.
pub const MIN_SIZE: i32 = 1;
pub const MAX_SIZE: i32 = 10;

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

pub fn validate_roadmap_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_ROADMAP_STATUSES, "roadmap status")
}

pub fn validate_milestone_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_MILESTONE_STATUSES, "milestone status")
}

pub fn validate_feature_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_FEATURE_STATUSES, "feature status")
}

pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    validate_one_of(priority, VALID_PRIORITIES, "priority")
}

/// Validate an effort or impact rating.
pub fn validate_size(value: i32, field: &str) -> Result<(), CoreError> {
    validate_int_range(value, MIN_SIZE, MAX_SIZE, field)
}

/// Reject a dependency list that names the feature itself.
///
/// `feature_id` is `None` for a feature that does not exist yet.
pub fn validate_dependency_list(
    feature_id: Option<DbId>,
    dependencies: &[DbId],
) -> Result<(), CoreError> {
    if let Some(id) = feature_id {
        if dependencies.contains(&id) {
            return Err(CoreError::Validation(format!(
                "Feature {id} cannot depend on itself"
            )));
        }
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Progress
-------------------------------------------------------------------------- */

/// Share of `statuses` equal to `completed`, one decimal. Empty is 0.
pub fn completion_percentage<'a, I>(statuses: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let (done, total) = statuses.into_iter().fold((0usize, 0usize), |(d, t), s| {
        (d + usize::from(s == FEATURE_STATUS_COMPLETED), t + 1)
    });
    percent_of(done as f64, total as f64)
}

pub fn summarize_features<'a, I>(statuses: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    summarize(statuses, VALID_FEATURE_STATUSES)
}

pub fn summarize_milestones<'a, I>(statuses: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    summarize(statuses, VALID_MILESTONE_STATUSES)
}

pub fn summarize_roadmaps<'a, I>(statuses: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    summarize(statuses, VALID_ROADMAP_STATUSES)
}
