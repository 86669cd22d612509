/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - token service, user directory, login service
 * - Meant to be cloned per request (everything inside is Arc)
 * - Read-only after startup; safe for concurrent requests
 */
use std::sync::Arc;

use crate::services::auth::{LoginService, TokenService};
use crate::services::directory::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserDirectory>,
    pub login: LoginService,
}

impl AppState {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserDirectory>) -> Self {
        let login = LoginService::new(users.clone(), tokens.clone());
        Self {
            tokens,
            users,
            login,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("users", &self.users.backend_name())
            .finish()
    }
}
