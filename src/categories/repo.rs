use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_date: OffsetDateTime,
}

pub async fn list(db: impl PgExecutor<'_>) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_date, updated_date
        FROM category
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl PgExecutor<'_>, id: i32) -> anyhow::Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_date, updated_date
        FROM category
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(category)
}

pub async fn exists(db: impl PgExecutor<'_>, id: i32) -> anyhow::Result<bool> {
    let row = sqlx::query_scalar::<_, i32>("SELECT id FROM category WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

pub async fn name_exists(db: impl PgExecutor<'_>, name: &str) -> anyhow::Result<bool> {
    let row = sqlx::query_scalar::<_, i32>("SELECT id FROM category WHERE name = $1")
        .bind(name)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

pub async fn insert(db: impl PgExecutor<'_>, name: &str) -> anyhow::Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO category (name)
        VALUES ($1)
        RETURNING id, name, created_date, updated_date
        "#,
    )
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(category)
}

/// Returns `None` when no row matched the id.
pub async fn update(
    db: impl PgExecutor<'_>,
    id: i32,
    name: &str,
) -> anyhow::Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE category
        SET name = $1, updated_date = CURRENT_TIMESTAMP
        WHERE id = $2
        RETURNING id, name, created_date, updated_date
        "#,
    )
    .bind(name)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(category)
}

/// Returns whether a row was deleted.
pub async fn delete(db: impl PgExecutor<'_>, id: i32) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM category WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
