/*
 * Responsibility
 * - URL layout of v1
 * - Every v1 route goes through the authentication middleware; whether a route
 *   needs a principal is decided by the extractors its handler takes
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{admin, auth, health::health};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/admin/users/{username}", get(admin::get_user));

    middleware::auth::apply(router, state)
}
