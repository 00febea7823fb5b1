use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::AuthConfig, state::AppState};

/// Subject claim stamped into every access token and required on verification.
pub const TOKEN_SUBJECT: &str = "accessApi";

/// Access-token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Holds JWT signing and verification keys with the configured lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub access_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let AuthConfig {
            access_token_secret,
            access_ttl_minutes,
        } = state.config.auth.clone();
        Self {
            encoding: EncodingKey::from_secret(access_token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(access_token_secret.as_bytes()),
            access_ttl: Duration::from_secs((access_ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i32) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.access_ttl.as_secs() as i64);
        let claims = Claims {
            user_id,
            sub: TOKEN_SUBJECT.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "access token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.sub = Some(TOKEN_SUBJECT.to_string());
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.user_id, "access token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, TOKEN_SUBJECT);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_rejects_wrong_secret() {
        let keys = make_keys();
        let token = keys.sign(1).expect("sign");
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            access_ttl: Duration::from_secs(3600),
        };
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            user_id: 1,
            sub: TOKEN_SUBJECT.to_string(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_wrong_subject() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            user_id: 1,
            sub: "somethingElse".to_string(),
            iat: now as usize,
            exp: (now + 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not-a-token").is_err());
    }
}
