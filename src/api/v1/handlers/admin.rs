/*
 * Responsibility
 * - Administrative lookups (ROLE_ADMIN only, enforced by the AdminUser extractor)
 */
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use crate::api::v1::dto::auth::PrincipalResponse;
use crate::api::v1::extractors::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PrincipalResponse>, AppError> {
    info!(admin = %admin.username(), target = %username, "admin user lookup");

    let principal = state.users.load_by_username(&username).await?;

    Ok(Json(principal.into()))
}
