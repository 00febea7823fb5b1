use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    categories::{dto::CategoryRequest, repo, repo::Category},
    error::ApiError,
    params,
    products,
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = repo::list(&state.db).await?;
    Ok(Json(categories))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = params::parse_id(&id)?;
    let category = repo::find_by_id(&state.db, id).await?.ok_or_else(|| {
        ApiError::NotFound(format!("Category with an ID of {id} does not exist."))
    })?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = payload.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(ApiError::Unprocessable("Name is required.".into()));
    }

    let mut tx = state.db.begin().await?;

    if repo::name_exists(&mut *tx, &name).await? {
        warn!(%name, "duplicate category name");
        return Err(ApiError::Conflict(format!(
            "Category '{name}' already exists."
        )));
    }

    let category = repo::insert(&mut *tx, &name).await?;
    tx.commit().await?;

    info!(category_id = category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let id = params::parse_id(&id)?;

    let name = payload.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(ApiError::Unprocessable("Name is required.".into()));
    }

    let mut tx = state.db.begin().await?;

    // The uniqueness check does not exclude the row being updated; renaming a
    // category to its current name is a conflict.
    if repo::name_exists(&mut *tx, &name).await? {
        warn!(%name, "duplicate category name");
        return Err(ApiError::Conflict(format!(
            "Category '{name}' already exists."
        )));
    }

    let Some(category) = repo::update(&mut *tx, id, &name).await? else {
        return Err(ApiError::NotFound(format!(
            "Category with an ID of {id} does not exist."
        )));
    };
    tx.commit().await?;

    info!(category_id = category.id, "category updated");
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = params::parse_id(&id)?;

    let mut tx = state.db.begin().await?;

    let count = products::repo::count_by_category(&mut *tx, id).await?;
    if count > 0 {
        warn!(category_id = id, count, "category still referenced");
        return Err(ApiError::Conflict(referenced_message(id, count)));
    }

    if !repo::delete(&mut *tx, id).await? {
        return Err(ApiError::NotFound(format!(
            "Category with an ID of {id} does not exist"
        )));
    }
    tx.commit().await?;

    info!(category_id = id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn referenced_message(id: i32, count: i64) -> String {
    let noun = if count > 1 { "products" } else { "product" };
    format!("Category with an ID of {id} is being used in {count} {noun}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_message_pluralizes() {
        assert_eq!(
            referenced_message(3, 1),
            "Category with an ID of 3 is being used in 1 product."
        );
        assert_eq!(
            referenced_message(3, 2),
            "Category with an ID of 3 is being used in 2 products."
        );
        assert_eq!(
            referenced_message(10, 17),
            "Category with an ID of 10 is being used in 17 products."
        );
    }
}
