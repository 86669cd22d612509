/*
 * Responsibility
 * - GET /health (liveness; public, passes through the auth middleware untouched)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
