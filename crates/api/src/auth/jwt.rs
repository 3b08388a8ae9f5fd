//! Access tokens.
//!
//! Tokens are HS256 JWTs issued by `opsdeck`. The subject is the only identity
//! the rest of the API trusts; nothing else in the claims grants access.

use chrono::Utc;
use jsonwebtoken::errors::Error as TokenError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use opsdeck_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{parsed_or, required, ConfigError};

/// Value of the `iss` claim. Tokens from any other issuer are rejected.
pub const TOKEN_ISSUER: &str = "opsdeck";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Per-token id, traced when a request authenticates.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token_expiry_mins =
            parsed_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS)?;
        if access_token_expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_EXPIRY_MINS",
                value: access_token_expiry_mins.to_string(),
            });
        }
        Ok(Self {
            secret: required("JWT_SECRET")?,
            access_token_expiry_mins,
        })
    }

    /// Token lifetime as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn validation() -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);
        // `sub` is numeric, and jsonwebtoken only counts a string `sub` as
        // present, so it cannot be listed here.
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

pub fn generate_access_token(user_id: DbId, config: &JwtConfig) -> Result<String, TokenError> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iss: TOKEN_ISSUER.to_string(),
        iat,
        exp: iat + config.expires_in_secs(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, expiry and issuer, then return the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}
