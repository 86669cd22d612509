use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{DirectoryError, Principal, UserDirectory};

/// Map-backed directory for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, Principal>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, principal: Principal) -> Self {
        self.insert(principal);
        self
    }

    /// Adds or replaces a principal keyed by its username.
    pub fn insert(&self, principal: Principal) {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.insert(principal.username.clone(), principal);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load_by_username(&self, username: &str) -> Result<Principal, DirectoryError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        users
            .get(username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(username.to_string()))
    }
}
