use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub access_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let auth = AuthConfig {
            // No fallback for the signing secret: a missing value is a startup error.
            access_token_secret: std::env::var("ACCESS_TOKEN_SECRET")?,
            access_ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        Ok(Self { database_url, auth })
    }
}
