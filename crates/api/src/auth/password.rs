//! Password storage.
//!
//! Hashes are Argon2id PHC strings, so salt and cost parameters travel with
//! the hash. Hashing failures surface as [`CoreError::Internal`]; a stored hash
//! that cannot be parsed counts as a mismatch and is logged.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use opsdeck_core::error::CoreError;

pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
}

/// `true` only when `password` matches `stored`.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => true,
        Err(password_hash::Error::Password) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Password verification failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_and_verifies() {
        let hash = hash_password("opsdeck-passphrase").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("opsdeck-passphrase", &hash));
        assert!(!verify_password("opsdeck-passphrasE", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("twice").unwrap(), hash_password("twice").unwrap());
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("anything", "plaintext-in-the-column"));
    }
}
