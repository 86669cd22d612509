//! Admin login flow, end to end through the router.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{
    ADMIN_PASSWORD, ANALYST_PASSWORD, bootstrapped_app, get, json_body, post_json, test_app,
    test_config, test_state,
};
use tariff_api::app::build_router;

async fn login(app: &axum::Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            &json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admin_logs_in_and_reaches_admin_routes() {
    let (app, _) = test_app();
    let token = login(&app, "admin", ADMIN_PASSWORD).await;
    let bearer = format!("Bearer {token}");

    let me = app
        .clone()
        .oneshot(get("/api/v1/auth/me", Some(&bearer)))
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let body = json_body(me).await;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["authorities"], json!(["ROLE_ADMIN"]));

    let lookup = app
        .oneshot(get("/api/v1/admin/users/analyst", Some(&bearer)))
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::OK);
    let body = json_body(lookup).await;
    assert_eq!(body["username"], "analyst");
    assert_eq!(body["authorities"], json!(["ROLE_USER"]));
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn bootstrap_admin_can_log_in() {
    let app = bootstrapped_app();
    let token = login(&app, "admin", ADMIN_PASSWORD).await;

    let me = app
        .oneshot(get("/api/v1/auth/me", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_lookup_of_unknown_user_is_404() {
    let (app, _) = test_app();
    let token = login(&app, "admin", ADMIN_PASSWORD).await;

    let response = app
        .oneshot(get(
            "/api/v1/admin/users/nobody",
            Some(&format!("Bearer {token}")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_admin_is_forbidden_on_admin_routes() {
    let (app, _) = test_app();
    let token = login(&app, "analyst", ANALYST_PASSWORD).await;

    let response = app
        .oneshot(get(
            "/api/v1/admin/users/admin",
            Some(&format!("Bearer {token}")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let (app, _) = test_app();

    for (username, password) in [("admin", "wrong"), ("ghost", ADMIN_PASSWORD)] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/login",
                &json!({ "username": username, "password": password }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn blank_credentials_are_bad_request() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            &json!({ "username": " ", "password": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"]["code"],
        "INVALID_LOGIN_REQUEST"
    );
}

#[tokio::test]
async fn missing_password_field_is_bad_request_json() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json("/api/v1/auth/login", &json!({ "username": "admin" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_LOGIN_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn non_json_login_body_is_bad_request_json() {
    let (app, _) = test_app();

    let request = Request::builder()
        .uri("/api/v1/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("admin:admin-password"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"]["code"],
        "INVALID_LOGIN_REQUEST"
    );
}

#[tokio::test]
async fn login_body_over_configured_limit_is_413() {
    let mut config = test_config();
    config.http_body_limit_bytes = 64;
    let app = build_router(test_state(&config), &config);

    let oversized = json!({ "username": "admin", "password": "x".repeat(200) });

    // Declared length is refused before the handler runs.
    let declared = post_json("/api/v1/auth/login", &oversized);
    let len = serde_json::to_vec(&oversized).unwrap().len();
    let (mut parts, body) = declared.into_parts();
    parts.headers.insert(header::CONTENT_LENGTH, len.into());
    let response = app
        .clone()
        .oneshot(Request::from_parts(parts, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // Without a length header the limit trips while the body is read.
    let response = app
        .oneshot(post_json("/api/v1/auth/login", &oversized))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(response).await["error"]["code"], "PAYLOAD_TOO_LARGE");
}
