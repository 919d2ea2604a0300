use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::TokenKind;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Extracts and validates the bearer credential, yielding the caller's
/// account id. A missing header is `Unauthenticated` (401); a present but
/// invalid, expired or non-access token is `Unauthorized` (403).
#[derive(Debug)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(ApiError::Unauthorized);
            }
        };

        if claims.kind != TokenKind::Access {
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRef;
    use axum::http::Request;
    use crate::state::AppState;

    async fn extract(header: Option<&str>) -> Result<AuthUser, ApiError> {
        let state = AppState::fake();
        let mut builder = Request::builder().uri("/api/posts/1");
        if let Some(h) = header {
            builder = builder.header("Authorization", h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &state).await
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let err = extract(Some("Bearer not-a-jwt")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let err = extract(Some("Basic abc")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn valid_access_token_yields_caller_id() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign_access(99).unwrap();
        let AuthUser(id) = extract(Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(id, 99);
    }

    #[tokio::test]
    async fn refresh_token_is_rejected_for_requests() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign_refresh(99).unwrap();
        let err = extract(Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
