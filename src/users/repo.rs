use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};

/// Row of the `"user"` table. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

pub async fn list(db: impl PgExecutor<'_>) -> anyhow::Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password
        FROM "user"
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl PgExecutor<'_>, id: i32) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password
        FROM "user"
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn find_by_email(db: impl PgExecutor<'_>, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password
        FROM "user"
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn insert(
    db: impl PgExecutor<'_>,
    name: &str,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO "user" (name, email, password)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_never_exposes_the_password() {
        let user = User {
            id: 7,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "$2b$10$secret".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret"));
        assert!(json.contains("ada@example.com"));
    }
}
