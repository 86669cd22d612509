//! User directory: resolves a username to a [`Principal`].
//!
//! The authentication filter and the login handler only see the
//! [`UserDirectory`] trait; the backing store is picked at startup.
use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::repos::error::RepoError;

mod memory;
mod postgres;

pub use memory::InMemoryUserDirectory;
pub use postgres::PgUserDirectory;

/// Authority granted to administrators.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// A resolved identity. Owned by the directory; never mutated by callers.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub password_hash: String,
    pub authorities: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        authorities: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("authorities", &self.authorities)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user not found: {0}")]
    NotFound(String),
    #[error("directory backend failure")]
    Backend(#[from] RepoError),
}

/// Lookup contract shared by every request. Implementations must tolerate
/// concurrent reads from many requests.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn load_by_username(&self, username: &str) -> Result<Principal, DirectoryError>;
}
