#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde_json::Value;
use tariff_api::{
    app::{build_router, build_state},
    config::{AppEnv, BootstrapAdmin, Config},
    services::{
        auth::build_token_service,
        directory::{InMemoryUserDirectory, Principal, ROLE_ADMIN},
    },
    state::AppState,
};

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const ANALYST_PASSWORD: &str = "analyst-password";

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        database_url: None,
        bootstrap_admin: Some(BootstrapAdmin {
            username: "admin".to_string(),
            password_hash: bcrypt::hash(ADMIN_PASSWORD, 4).unwrap(),
        }),
        auth_issuer: "tariff-api".to_string(),
        jwt_secret: SECRET.to_vec(),
        access_token_ttl_seconds: 3600,
        http_body_limit_bytes: 1024 * 1024,
        http_timeout_seconds: 30,
    }
}

/// State with an admin and a plain analyst account.
pub fn test_state(config: &Config) -> AppState {
    let users = InMemoryUserDirectory::new()
        .with_user(Principal::new(
            "admin",
            bcrypt::hash(ADMIN_PASSWORD, 4).unwrap(),
            [ROLE_ADMIN],
        ))
        .with_user(Principal::new(
            "analyst",
            bcrypt::hash(ANALYST_PASSWORD, 4).unwrap(),
            ["ROLE_USER"],
        ));

    AppState::new(build_token_service(config), Arc::new(users))
}

pub fn test_app() -> (Router, AppState) {
    let config = test_config();
    let state = test_state(&config);
    (build_router(state.clone(), &config), state)
}

/// Router assembled exactly like `app::run` does, from config only.
pub fn bootstrapped_app() -> Router {
    let config = test_config();
    let state = build_state(&config).unwrap();
    build_router(state, &config)
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
