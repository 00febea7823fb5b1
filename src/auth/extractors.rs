use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Resolves the caller from the `Authorization` header.
///
/// The header carries the bare token with no `Bearer ` scheme prefix.
pub struct AuthUser(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Access token not found.".into()))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired access token");
                return Err(ApiError::Unauthorized(
                    "Access token is invalid or has expired.".into(),
                ));
            }
        };

        Ok(AuthUser(claims.user_id))
    }
}
