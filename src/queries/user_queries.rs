use sqlx::PgPool;

use crate::{error::Result, models::User};

/// Emails are stored lowercased and matched case-insensitively.
///
/// Returns `None` when the address is already registered.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, password)
        VALUES (lower(trim($1)), $2, $3)
        ON CONFLICT DO NOTHING
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE lower(email) = lower(trim($1))",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
