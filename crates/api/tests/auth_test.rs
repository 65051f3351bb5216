//! Registration, login and access control.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::test_app;
use financeflow_db::UserRepository;

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app().await;
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_register_returns_token_and_normalised_user() {
    let app = test_app().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "  Ana@Example.COM ", "password": "secret123", "name": "Ana" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_without_new_row() {
    let app = test_app().await;
    app.register("dup@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "DUP@example.com", "password": "another1", "name": "Other" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");

    let overview = UserRepository::new((*app.state.db).clone())
        .overview()
        .await
        .unwrap();
    assert_eq!(overview.total_users, 1);
}

#[tokio::test]
async fn test_register_validates_payload() {
    let app = test_app().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "123", "name": "X" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_checks_password() {
    let app = test_app().await;
    app.register("login@example.com").await;

    let (ok, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "  Login@Example.com ", "password": "secret123" })),
        )
        .await;
    assert_eq!(ok, StatusCode::OK);
    assert_eq!(body["user"]["email"], "login@example.com");

    let (wrong, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "login@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (unknown, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = test_app().await;
    let (token, id) = app.register("me@example.com").await;

    let (status, body) = app.get("/api/auth/me", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["email"], "me@example.com");
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = test_app().await;

    let (missing, body) = app.send(Method::GET, "/api/accounts", None, None).await;
    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (forged, _) = app
        .send(Method::GET, "/api/accounts", Some("not.a.token"), None)
        .await;
    assert_eq!(forged, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let app = test_app().await;
    let (token, _) = app.register("plain@example.com").await;

    let (status, body) = app.get("/api/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = app.get("/api/users/stats/overview", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, body) = app.get("/api/users", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_admin_manages_users() {
    let app = test_app().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .post(
            "/api/users",
            &admin,
            json!({
                "email": "New@Example.com",
                "password": "secret123",
                "name": "New",
                "role": "admin"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "new@example.com");
    assert_eq!(created["role"], "admin");
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .put(&format!("/api/users/{id}"), &admin, json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_active"], false);

    let (status, overview) = app.get("/api/users/stats/overview", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total_users"], 2);
    assert_eq!(overview["active_users"], 1);
    assert_eq!(overview["admin_users"], 1);
    assert_eq!(overview["new_users_last_30_days"], 2);

    let (status, _) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
