use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use time::OffsetDateTime;

use crate::products::repo::ProductWithCategory;

/// Body for product creation. `name`, `price` and `category_id` are required;
/// the rest fall back to column defaults.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub quantity: Option<i32>,
    pub active: Option<bool>,
    pub category_id: Option<i32>,
}

/// Body for product update. Every field is required.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub quantity: Option<i32>,
    pub active: Option<bool>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

/// Product as returned by read endpoints: the flat `category_id` is replaced
/// by a nested `{id, name}` category object.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub quantity: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_date: OffsetDateTime,
    pub category: CategoryRef,
}

impl From<ProductWithCategory> for ProductResponse {
    fn from(row: ProductWithCategory) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            currency: row.currency,
            quantity: row.quantity,
            active: row.active,
            created_date: row.created_date,
            updated_date: row.updated_date,
            category: CategoryRef {
                id: row.category_id,
                name: row.category_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn response_nests_the_category_and_drops_the_flat_id() {
        let row = ProductWithCategory {
            id: 5,
            name: "Dune".into(),
            description: None,
            price: Decimal::new(1299, 2),
            currency: "USD".into(),
            quantity: 3,
            active: true,
            created_date: datetime!(2024-01-01 00:00 UTC),
            updated_date: datetime!(2024-01-02 00:00 UTC),
            category_id: 2,
            category_name: "Books".into(),
        };

        let json = serde_json::to_value(ProductResponse::from(row)).unwrap();
        assert_eq!(json["category"], serde_json::json!({ "id": 2, "name": "Books" }));
        assert!(json.get("category_id").is_none());
        assert_eq!(json["price"], "12.99");
    }
}
