//! Activity log vocabulary.
//!
//! Every mutation writes one activity row naming the action, the entity
//! type and id, and a short human-readable description.

use crate::error::CoreError;
use crate::validation::validate_one_of;

pub const ACTION_CREATED: &str = "created";
pub const ACTION_UPDATED: &str = "updated";
pub const ACTION_DELETED: &str = "deleted";
pub const ACTION_SCORED: &str = "scored";
pub const ACTION_RECALCULATED: &str = "recalculated";
pub const ACTION_STATUS_CHANGED: &str = "status_changed";

pub const ENTITY_IDEA: &str = "idea";
pub const ENTITY_IDEA_CRITERION: &str = "idea_criterion";
pub const ENTITY_IDEA_COMPARISON: &str = "idea_comparison";
pub const ENTITY_ROADMAP: &str = "roadmap";
pub const ENTITY_MILESTONE: &str = "milestone";
pub const ENTITY_FEATURE: &str = "feature";
pub const ENTITY_TASK: &str = "task";
pub const ENTITY_CAMPAIGN: &str = "campaign";
pub const ENTITY_CUSTOMER: &str = "customer";
pub const ENTITY_DEAL: &str = "deal";
pub const ENTITY_NOTIFICATION: &str = "notification";
pub const ENTITY_USER: &str = "user";

pub const VALID_ENTITY_TYPES: &[&str] = &[
    ENTITY_IDEA,
    ENTITY_IDEA_CRITERION,
    ENTITY_IDEA_COMPARISON,
    ENTITY_ROADMAP,
    ENTITY_MILESTONE,
    ENTITY_FEATURE,
    ENTITY_TASK,
    ENTITY_CAMPAIGN,
    ENTITY_CUSTOMER,
    ENTITY_DEAL,
    ENTITY_NOTIFICATION,
    ENTITY_USER,
];

pub fn validate_entity_type(entity_type: &str) -> Result<(), CoreError> {
    validate_one_of(entity_type, VALID_ENTITY_TYPES, "entity type")
}

/// Human-readable label for an entity type (`idea_criterion` -> `idea criterion`).
pub fn entity_label(entity_type: &str) -> String {
    entity_type.replace('_', " ")
}

/// Build the description stored on an activity row.
///
/// Example: `describe("created", "idea", "Dark mode")` ->
/// `"Created idea \"Dark mode\""`.
pub fn describe(action: &str, entity_type: &str, name: &str) -> String {
    let verb = match action {
        ACTION_CREATED => "Created",
        ACTION_UPDATED => "Updated",
        ACTION_DELETED => "Deleted",
        ACTION_SCORED => "Scored",
        ACTION_RECALCULATED => "Recalculated",
        ACTION_STATUS_CHANGED => "Changed status of",
        other => other,
    };
    format!("{verb} {} \"{name}\"", entity_label(entity_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_known_actions() {
        assert_eq!(
            describe(ACTION_CREATED, ENTITY_IDEA, "Dark mode"),
            "Created idea \"Dark mode\""
        );
        assert_eq!(
            describe(ACTION_DELETED, ENTITY_IDEA_CRITERION, "Reach"),
            "Deleted idea criterion \"Reach\""
        );
    }

    #[test]
    fn describe_falls_back_to_raw_action() {
        assert_eq!(describe("archived", ENTITY_TASK, "x"), "archived task \"x\"");
    }

    #[test]
    fn entity_types_validate() {
        assert!(validate_entity_type("feature").is_ok());
        assert!(validate_entity_type("spaceship").is_err());
    }
}
