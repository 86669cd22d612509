use std::sync::{Arc, LazyLock};

use tracing::{debug, error, warn};

use crate::error::AppError;
use crate::services::auth::jwt::TokenService;
use crate::services::directory::{DirectoryError, UserDirectory};

// Checked for unknown usernames so every failed login runs one bcrypt verify.
static DUMMY_PASSWORD_HASH: LazyLock<String> = LazyLock::new(|| {
    bcrypt::hash("tariff-api-unknown-user", bcrypt::DEFAULT_COST).unwrap_or_default()
});

/// Service-level return type to keep handlers thin.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Exchanges username/password for a bearer token.
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<TokenService>,
}

impl LoginService {
    pub fn new(users: Arc<dyn UserDirectory>, tokens: Arc<TokenService>) -> Self {
        LazyLock::force(&DUMMY_PASSWORD_HASH);
        Self { users, tokens }
    }

    /// Unknown users and wrong passwords both end up as `Unauthorized`.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AppError> {
        let principal = match self.users.load_by_username(username).await {
            Ok(p) => p,
            Err(DirectoryError::NotFound(_)) => {
                debug!(username = %username, "login for unknown user");
                verify_password(password, &DUMMY_PASSWORD_HASH).await?;
                return Err(AppError::Unauthorized);
            }
            Err(err) => {
                error!(username = %username, error = %err, "user lookup failed during login");
                return Err(AppError::Internal);
            }
        };

        if !verify_password(password, &principal.password_hash).await? {
            debug!(username = %username, "login with wrong password");
            return Err(AppError::Unauthorized);
        }

        let access_token = self
            .tokens
            .issue(&principal.username, &principal.authorities)
            .map_err(|e| {
                error!(username = %username, error = %e, "failed to issue access token");
                AppError::Internal
            })?;

        debug!(username = %username, "issued access token");

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.tokens.ttl_seconds(),
        })
    }
}

// bcrypt is CPU bound; keep it off the async workers.
async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();

    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            error!(error = %e, "password verification task failed");
            AppError::Internal
        })?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            // A corrupt stored hash must not let anyone in.
            warn!(error = %e, "stored password hash is unusable");
            Ok(false)
        }
    }
}
