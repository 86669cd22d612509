/*
 * Responsibility
 * - SQLx access to the users table (lookup by username only)
 * - Takes a PgPool; DB errors are returned as RepoError
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

pub async fn find_by_username(db: &PgPool, username: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT username, password_hash, roles
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
