use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{jwt::JwtKeys, repo_types::Role};
use crate::error::AppError;

/// Identity taken from a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::token("Missing Authorization Header"))?;

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::token("Bad Authorization header. Expected 'Bearer <JWT>'"))
}

impl AuthUser {
    pub fn from_token(keys: &JwtKeys, token: &str) -> Result<Self, AppError> {
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::token("유효하지 않거나 만료된 토큰입니다.")
        })?;
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::token("토큰의 사용자 정보가 올바르지 않습니다."))?;
        Ok(Self {
            id,
            role: claims.role,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts)?;
        AuthUser::from_token(&keys, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::test_keys;
    use axum::http::Request;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/favorites");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_identity_from_valid_token() {
        let keys = test_keys();
        let token = keys.sign(5, Role::Admin).unwrap();
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let user = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap();
        assert_eq!(user, AuthUser { id: 5, role: Role::Admin });
    }

    #[tokio::test]
    async fn missing_header_is_token_error() {
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &test_keys())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Token(_)));
    }

    #[tokio::test]
    async fn wrong_scheme_is_token_error() {
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        let err = AuthUser::from_request_parts(&mut parts, &test_keys())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Token(_)));
    }

    #[tokio::test]
    async fn tampered_token_is_token_error() {
        let keys = test_keys();
        let mut token = keys.sign(5, Role::User).unwrap();
        token.push('x');
        let mut parts = parts_with(Some(&format!("Bearer {token}")));
        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert!(matches!(err, AppError::Token(_)));
    }
}
