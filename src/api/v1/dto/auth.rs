/*
 * Responsibility
 * - Request/response DTOs for /auth and /admin
 * - Shape checks only (validate()); credentials are checked in LoginService
 */
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::api::v1::extractors::Authentication;
use crate::services::auth::IssuedToken;
use crate::services::directory::Principal;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: u64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(t: IssuedToken) -> Self {
        Self {
            access_token: t.access_token,
            token_type: t.token_type.to_string(),
            expires_in: t.expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub username: String,
    pub authorities: BTreeSet<String>,
}

impl From<&Authentication> for PrincipalResponse {
    fn from(auth: &Authentication) -> Self {
        Self {
            username: auth.username().to_string(),
            authorities: auth.authorities.clone(),
        }
    }
}

impl From<Principal> for PrincipalResponse {
    fn from(p: Principal) -> Self {
        Self {
            username: p.username,
            authorities: p.authorities,
        }
    }
}
