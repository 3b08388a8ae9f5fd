//! Notification kinds and message builders.

use crate::error::CoreError;
use crate::validation::{validate_description, validate_name, validate_one_of};

pub const KIND_INFO: &str = "info";
pub const KIND_FEATURE_READY: &str = "feature_ready";
pub const KIND_DEAL_WON: &str = "deal_won";
pub const KIND_REMINDER: &str = "reminder";

pub const VALID_NOTIFICATION_KINDS: &[&str] =
    &[KIND_INFO, KIND_FEATURE_READY, KIND_DEAL_WON, KIND_REMINDER];

pub fn validate_notification(kind: &str, title: &str, message: &str) -> Result<(), CoreError> {
    validate_one_of(kind, VALID_NOTIFICATION_KINDS, "notification kind")?;
    validate_name(title, "Title")?;
    validate_description(Some(message), "Message")
}

/// Title and message announcing that a feature can start.
pub fn feature_ready_message(feature_name: &str, completed_name: &str) -> (String, String) {
    (
        format!("Ready to start: {feature_name}"),
        format!("\"{completed_name}\" is complete, so \"{feature_name}\" has no unfinished dependencies."),
    )
}

/// Title and message announcing a won deal.
pub fn deal_won_message(deal_title: &str, value: f64) -> (String, String) {
    (
        format!("Deal won: {deal_title}"),
        format!("\"{deal_title}\" closed as won with a value of {value:.2}."),
    )
}
