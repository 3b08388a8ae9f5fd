//! Account field validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::validation::validate_name;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Validate the fields of a new account.
pub fn validate_registration(email: &str, name: &str, password: &str) -> Result<(), CoreError> {
    validate_email(email)?;
    validate_name(name, "Name")?;
    validate_password(password)
}

/// Emails are compared case-insensitively; store them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("ada example.com").is_err());
    }

    #[test]
    fn short_password_rejected() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
