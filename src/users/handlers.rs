use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    users::{dto::CurrentUserResponse, repo, repo::User},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/current", get(current_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = repo::list(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = repo::find_by_id(&state.db, user_id).await?;
    Ok(Json(CurrentUserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
