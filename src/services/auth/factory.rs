/// Factory: build auth-related services from application `Config`.
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::TokenService;
use crate::services::directory::{
    InMemoryUserDirectory, PgUserDirectory, Principal, ROLE_ADMIN, UserDirectory,
};

pub fn build_token_service(config: &Config) -> Arc<TokenService> {
    Arc::new(TokenService::new(
        &config.jwt_secret,
        config.auth_issuer.clone(),
        config.access_token_ttl_seconds,
    ))
}

pub fn build_user_directory(config: &Config) -> Result<Arc<dyn UserDirectory>, AppError> {
    if let Some(database_url) = &config.database_url {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)
            .map_err(|e| {
                warn!(error = %e, "invalid DATABASE_URL");
                AppError::Internal
            })?;
        info!("user directory: postgres");
        return Ok(Arc::new(PgUserDirectory::new(pool)));
    }

    let directory = InMemoryUserDirectory::new();
    match &config.bootstrap_admin {
        Some(admin) => {
            directory.insert(Principal::new(
                admin.username.clone(),
                admin.password_hash.clone(),
                [ROLE_ADMIN],
            ));
            info!(username = %admin.username, "user directory: memory (bootstrap admin)");
        }
        None => warn!("user directory: memory with no users; nobody can log in"),
    }

    Ok(Arc::new(directory))
}
