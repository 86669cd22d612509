use async_trait::async_trait;
use sqlx::PgPool;

use super::{DirectoryError, Principal, UserDirectory};
use crate::repos::user_repo;

/// Directory backed by the `users` table.
#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn load_by_username(&self, username: &str) -> Result<Principal, DirectoryError> {
        let row = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(username.to_string()))?;

        Ok(Principal::new(row.username, row.password_hash, row.roles))
    }
}
