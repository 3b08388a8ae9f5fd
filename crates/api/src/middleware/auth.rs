//! Bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::CallerContext;
use opsdeck_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The user a request acts for.
///
/// Handlers take this as an extractor and hand [`AuthUser::caller`] to every
/// ownership check. A request without a valid token never reaches the handler.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl AuthUser {
    pub fn caller(&self) -> CallerContext {
        CallerContext::new(self.user_id)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| CoreError::Unauthorized("Authorization header is not valid text".into()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;
        tracing::trace!(user_id = claims.sub, jti = %claims.jti, "Authenticated request");

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_unauthorized() {
        for value in ["Basic dXNlcjpwdw==", "Bearer ", "abc.def"] {
            assert_matches!(
                bearer_token(&headers(value)),
                Err(CoreError::Unauthorized(_))
            );
        }
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }
}
