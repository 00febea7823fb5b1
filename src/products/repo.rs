use serde::{Deserialize, Serialize};
use sqlx::{types::Decimal, FromRow, PgExecutor};
use time::OffsetDateTime;

/// Row of the `product` table, returned as-is from create and update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub quantity: i32,
    pub active: bool,
    pub category_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_date: OffsetDateTime,
}

/// Product joined with its category, for read endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub quantity: i32,
    pub active: bool,
    pub created_date: OffsetDateTime,
    pub updated_date: OffsetDateTime,
    pub category_id: i32,
    pub category_name: String,
}

/// Column values for insert and full update.
#[derive(Debug)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub quantity: i32,
    pub active: bool,
    pub category_id: i32,
}

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.currency, p.quantity, p.active,
           p.created_date, p.updated_date, c.id AS category_id, c.name AS category_name
    FROM product AS p
    JOIN category AS c ON c.id = p.category_id
"#;

pub async fn list(db: impl PgExecutor<'_>) -> anyhow::Result<Vec<ProductWithCategory>> {
    let rows = sqlx::query_as::<_, ProductWithCategory>(&format!("{SELECT_WITH_CATEGORY} ORDER BY p.id"))
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    db: impl PgExecutor<'_>,
    id: i32,
) -> anyhow::Result<Option<ProductWithCategory>> {
    let row = sqlx::query_as::<_, ProductWithCategory>(&format!("{SELECT_WITH_CATEGORY} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn list_by_category(
    db: impl PgExecutor<'_>,
    category_id: i32,
) -> anyhow::Result<Vec<ProductWithCategory>> {
    let rows =
        sqlx::query_as::<_, ProductWithCategory>(&format!("{SELECT_WITH_CATEGORY} WHERE p.category_id = $1"))
            .bind(category_id)
            .fetch_all(db)
            .await?;
    Ok(rows)
}

pub async fn count_by_category(db: impl PgExecutor<'_>, category_id: i32) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn insert(db: impl PgExecutor<'_>, fields: &ProductFields) -> anyhow::Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO product (name, description, price, currency, quantity, active, category_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, description, price, currency, quantity, active, category_id,
                  created_date, updated_date
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(&fields.currency)
    .bind(fields.quantity)
    .bind(fields.active)
    .bind(fields.category_id)
    .fetch_one(db)
    .await?;
    Ok(product)
}

/// Returns `None` when no row matched the id.
pub async fn update(
    db: impl PgExecutor<'_>,
    id: i32,
    fields: &ProductFields,
) -> anyhow::Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE product
        SET name = $1, description = $2, price = $3, currency = $4, quantity = $5,
            active = $6, category_id = $7, updated_date = CURRENT_TIMESTAMP
        WHERE id = $8
        RETURNING id, name, description, price, currency, quantity, active, category_id,
                  created_date, updated_date
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(&fields.currency)
    .bind(fields.quantity)
    .bind(fields.active)
    .bind(fields.category_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(product)
}

/// Returns whether a row was deleted.
pub async fn delete(db: impl PgExecutor<'_>, id: i32) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM product WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
