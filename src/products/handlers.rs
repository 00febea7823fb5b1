use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    categories,
    error::ApiError,
    params,
    products::{
        dto::{CreateProductRequest, ProductResponse, UpdateProductRequest},
        repo,
        repo::{Product, ProductFields},
    },
    state::AppState,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/category/:categoryId", get(list_by_category))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = repo::list(&state.db).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = params::parse_id(&id)?;
    let product = repo::find_by_id(&state.db, id).await?.ok_or_else(|| {
        ApiError::NotFound(format!("Product with an ID of {id} does not exist."))
    })?;
    Ok(Json(product.into()))
}

#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let category_id = params::parse_category_id(&category_id)?;

    if !categories::repo::exists(&state.db, category_id).await? {
        return Err(ApiError::NotFound(format!(
            "Category with an ID of {category_id} does not exist."
        )));
    }

    let products = repo::list_by_category(&state.db, category_id).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let name = payload.name.unwrap_or_default();

    let mut missing = Vec::new();
    if name.trim().is_empty() {
        missing.push("name");
    }
    if payload.price.is_none() {
        missing.push("price");
    }
    if payload.category_id.is_none() {
        missing.push("category ID");
    }
    if !missing.is_empty() {
        return Err(ApiError::Unprocessable(format!(
            "Missing {}: {}",
            if missing.len() > 1 { "fields" } else { "field" },
            missing.join(", ")
        )));
    }
    let price = payload.price.unwrap_or_default();
    let category_id = payload.category_id.unwrap_or_default();

    let mut tx = state.db.begin().await?;

    if !categories::repo::exists(&mut *tx, category_id).await? {
        warn!(category_id, "product references unknown category");
        return Err(ApiError::NotFound(format!(
            "Category with an ID of {category_id} does not exist."
        )));
    }

    let fields = ProductFields {
        name,
        description: payload.description,
        price,
        currency: payload.currency.unwrap_or_else(|| "USD".into()),
        quantity: payload.quantity.unwrap_or(0),
        active: payload.active.unwrap_or(true),
        category_id,
    };
    let product = repo::insert(&mut *tx, &fields).await?;
    tx.commit().await?;

    info!(product_id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let id = params::parse_id(&id)?;

    let fields = require_all_fields(payload)?;

    let mut tx = state.db.begin().await?;

    if !categories::repo::exists(&mut *tx, fields.category_id).await? {
        warn!(category_id = fields.category_id, "product references unknown category");
        return Err(ApiError::NotFound(format!(
            "Category with an ID of {} does not exist.",
            fields.category_id
        )));
    }

    let Some(product) = repo::update(&mut *tx, id, &fields).await? else {
        return Err(ApiError::NotFound(format!(
            "Product with an ID of {id} does not exist."
        )));
    };
    tx.commit().await?;

    info!(product_id = product.id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = params::parse_id(&id)?;

    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!(
            "Product with an ID of {id} does not exist."
        )));
    }

    info!(product_id = id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// The update contract requires the full column set; rejections use status 400
/// and always-plural wording, unlike creation.
fn require_all_fields(payload: UpdateProductRequest) -> Result<ProductFields, ApiError> {
    let name = payload.name.unwrap_or_default();
    let description = payload.description.unwrap_or_default();
    let currency = payload.currency.unwrap_or_default();

    let mut missing = Vec::new();
    if name.trim().is_empty() {
        missing.push("name");
    }
    if description.trim().is_empty() {
        missing.push("description");
    }
    if payload.price.is_none() {
        missing.push("price");
    }
    if currency.trim().is_empty() {
        missing.push("currency");
    }
    if payload.quantity.is_none() {
        missing.push("quantity");
    }
    if payload.active.is_none() {
        missing.push("active");
    }
    if payload.category_id.is_none() {
        missing.push("category ID");
    }
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    Ok(ProductFields {
        name,
        description: Some(description),
        price: payload.price.unwrap_or_default(),
        currency,
        quantity: payload.quantity.unwrap_or_default(),
        active: payload.active.unwrap_or_default(),
        category_id: payload.category_id.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Decimal;

    fn full_payload() -> UpdateProductRequest {
        UpdateProductRequest {
            name: Some("Dune".into()),
            description: Some("A novel".into()),
            price: Some(Decimal::new(1299, 2)),
            currency: Some("USD".into()),
            quantity: Some(3),
            active: Some(true),
            category_id: Some(2),
        }
    }

    #[test]
    fn full_update_payload_passes() {
        let fields = require_all_fields(full_payload()).expect("all fields present");
        assert_eq!(fields.name, "Dune");
        assert_eq!(fields.category_id, 2);
    }

    #[test]
    fn update_lists_every_missing_field_in_order() {
        let err = require_all_fields(UpdateProductRequest {
            name: None,
            description: None,
            price: None,
            currency: None,
            quantity: None,
            active: None,
            category_id: None,
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing fields: name, description, price, currency, quantity, active, category ID"
        );
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_wording_stays_plural_for_a_single_field() {
        let mut payload = full_payload();
        payload.active = None;
        let err = require_all_fields(payload).unwrap_err();
        assert_eq!(err.to_string(), "Missing fields: active");
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let mut payload = full_payload();
        payload.name = Some("   ".into());
        let err = require_all_fields(payload).unwrap_err();
        assert_eq!(err.to_string(), "Missing fields: name");
    }
}
