use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::ApiError,
    state::AppState,
    users::repo as users,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let mut missing = Vec::new();
    if name.trim().is_empty() {
        missing.push("name");
    }
    if email.trim().is_empty() {
        missing.push("email");
    }
    if password.trim().is_empty() {
        missing.push("password");
    }
    if !missing.is_empty() {
        return Err(ApiError::Unprocessable(format!(
            "Missing field{}: {}",
            if missing.len() > 1 { "s" } else { "" },
            missing.join(", ")
        )));
    }

    let mut tx = state.db.begin().await?;

    if users::find_by_email(&mut *tx, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::Conflict("Email already exists.".into()));
    }

    let hashed = hash_password(&password)?;
    let user = users::insert(&mut *tx, &name, &email, &hashed).await?;
    tx.commit().await?;

    info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully.".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(ApiError::Unprocessable(
            "Email and password are required.".into(),
        ));
    }

    // Unknown email and wrong password collapse to the same message.
    let Some(user) = users::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login with unknown email");
        return Err(ApiError::Unauthorized("Email or password is invalid.".into()));
    };

    if !verify_password(&password, &user.password)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::Unauthorized("Email or password is invalid.".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        access_token,
    }))
}
