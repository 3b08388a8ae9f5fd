//! Idea lifecycle vocabulary and scoring-driven status transitions.

use crate::error::CoreError;
use crate::status_summary::{summarize, StatusSummary};
use crate::types::DbId;
use crate::validation::validate_one_of;

pub const IDEA_STATUS_DRAFT: &str = "draft";
pub const IDEA_STATUS_EVALUATED: &str = "evaluated";
pub const IDEA_STATUS_ARCHIVED: &str = "archived";

pub const VALID_IDEA_STATUSES: &[&str] =
    &[IDEA_STATUS_DRAFT, IDEA_STATUS_EVALUATED, IDEA_STATUS_ARCHIVED];

/// Maximum number of ideas in one comparison.
pub const MAX_COMPARISON_IDEAS: usize = 20;

pub fn validate_idea_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_IDEA_STATUSES, "idea status")
}

/// Validate the idea list of a comparison: non-empty, bounded, no repeats.
pub fn validate_comparison_ideas(idea_ids: &[DbId]) -> Result<(), CoreError> {
    if idea_ids.is_empty() {
        return Err(CoreError::Validation(
            "A comparison needs at least one idea".into(),
        ));
    }
    if idea_ids.len() > MAX_COMPARISON_IDEAS {
        return Err(CoreError::Validation(format!(
            "A comparison holds at most {MAX_COMPARISON_IDEAS} ideas"
        )));
    }
    let mut sorted = idea_ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != idea_ids.len() {
        return Err(CoreError::Validation(
            "A comparison cannot list the same idea twice".into(),
        ));
    }
    Ok(())
}

/// Status an idea should hold after a scoring pass.
///
/// - `archived` is never changed by scoring.
/// - With no scores the idea is (back to) `draft`.
/// - A `draft` idea becomes `evaluated` once every criterion has a score.
/// - An `evaluated` idea stays `evaluated` while it has any score, even if
///   a criterion is added later.
pub fn status_after_scoring(
    current: &str,
    scored_criteria: usize,
    total_criteria: usize,
) -> &'static str {
    if current == IDEA_STATUS_ARCHIVED {
        return IDEA_STATUS_ARCHIVED;
    }
    if scored_criteria == 0 {
        return IDEA_STATUS_DRAFT;
    }
    if current == IDEA_STATUS_EVALUATED || scored_criteria >= total_criteria {
        return IDEA_STATUS_EVALUATED;
    }
    IDEA_STATUS_DRAFT
}

/// Check a status change requested through the API rather than by scoring.
///
/// Archiving is always allowed. Leaving `archived` is allowed, after which the
/// caller re-runs the scoring rules. A manual move between `draft` and
/// `evaluated` is refused, and `evaluated` needs at least one score.
pub fn validate_manual_status(
    current: &str,
    requested: &str,
    has_scores: bool,
) -> Result<(), CoreError> {
    validate_idea_status(requested)?;
    if requested == current || requested == IDEA_STATUS_ARCHIVED {
        return Ok(());
    }
    if requested == IDEA_STATUS_EVALUATED && !has_scores {
        return Err(CoreError::Validation(
            "An idea needs at least one score before it can be evaluated".into(),
        ));
    }
    if current != IDEA_STATUS_ARCHIVED {
        return Err(CoreError::Validation(
            "Draft and evaluated are set by scoring; only archiving can be set by hand".into(),
        ));
    }
    Ok(())
}

pub fn summarize_ideas<'a, I>(statuses: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    summarize(statuses, VALID_IDEA_STATUSES)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unscored_idea_stays_draft() {
        assert_eq!(status_after_scoring("draft", 0, 3), "draft");
    }

    #[test]
    fn partial_scoring_keeps_draft() {
        assert_eq!(status_after_scoring("draft", 2, 3), "draft");
    }

    #[test]
    fn full_pass_evaluates() {
        assert_eq!(status_after_scoring("draft", 3, 3), "evaluated");
    }

    #[test]
    fn evaluated_survives_new_criterion() {
        assert_eq!(status_after_scoring("evaluated", 3, 4), "evaluated");
    }

    #[test]
    fn losing_every_score_reverts_to_draft() {
        assert_eq!(status_after_scoring("evaluated", 0, 4), "draft");
    }

    #[test]
    fn archived_is_sticky() {
        assert_eq!(status_after_scoring("archived", 3, 3), "archived");
        assert_eq!(status_after_scoring("archived", 0, 3), "archived");
    }

    #[test]
    fn unscored_idea_cannot_be_marked_evaluated() {
        assert_matches!(
            validate_manual_status("draft", "evaluated", false),
            Err(CoreError::Validation(msg)) if msg.contains("score")
        );
        assert_matches!(
            validate_manual_status("archived", "evaluated", false),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn draft_and_evaluated_only_move_by_scoring() {
        assert!(validate_manual_status("draft", "evaluated", true).is_err());
        assert!(validate_manual_status("evaluated", "draft", true).is_err());
        assert!(validate_manual_status("evaluated", "evaluated", true).is_ok());
    }

    #[test]
    fn archiving_and_unarchiving_are_manual() {
        assert!(validate_manual_status("draft", "archived", false).is_ok());
        assert!(validate_manual_status("evaluated", "archived", true).is_ok());
        assert!(validate_manual_status("archived", "draft", true).is_ok());
        assert!(validate_manual_status("archived", "evaluated", true).is_ok());
        assert!(validate_manual_status("archived", "shelved", true).is_err());
    }

    #[test]
    fn comparison_list_rules() {
        assert!(validate_comparison_ideas(&[]).is_err());
        assert!(validate_comparison_ideas(&[1, 2, 1]).is_err());
        assert!(validate_comparison_ideas(&[1, 2, 3]).is_ok());
        let too_many: Vec<i64> = (0..=MAX_COMPARISON_IDEAS as i64).collect();
        assert!(validate_comparison_ideas(&too_many).is_err());
    }

    #[test]
    fn idea_status_vocabulary() {
        assert!(validate_idea_status("evaluated").is_ok());
        assert!(validate_idea_status("scored").is_err());
    }
}
