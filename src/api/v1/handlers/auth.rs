/*
 * Responsibility
 * - POST /auth/login: username/password -> bearer token
 * - GET  /auth/me: echo the authenticated principal
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::debug;

use crate::api::v1::dto::auth::{LoginRequest, PrincipalResponse, TokenResponse};
use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload.map_err(invalid_body)?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LOGIN_REQUEST", msg))?;

    let issued = state.login.login(req.username.trim(), &req.password).await?;

    Ok(Json(issued.into()))
}

// Keeps body rejections in the JSON error envelope.
fn invalid_body(rejection: JsonRejection) -> AppError {
    debug!(status = %rejection.status(), error = %rejection.body_text(), "login body rejected");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    AppError::bad_request("INVALID_LOGIN_REQUEST", rejection.body_text())
}

pub async fn me(CurrentUser(auth): CurrentUser) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&auth))
}
