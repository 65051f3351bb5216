//! Shared fixtures for route tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use financeflow_api::{AppState, create_router};
use financeflow_db::migration::{Migrator, MigratorTrait};
use financeflow_shared::{JwtConfig, JwtService, UserRole};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Router over a fresh in-memory database.
pub async fn test_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let state = AppState::new(
        db,
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            expires_days: 7,
        }),
    );

    TestApp {
        router: create_router(state.clone(), "http://localhost:5173"),
        state,
    }
}

impl TestApp {
    /// Sends a request and returns the status and raw body.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, header::HeaderMap, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Sends a request and parses the JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, text) = self.send_raw(method, uri, token, body).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user and returns its token and ID.
    pub async fn register(&self, email: &str) -> (String, Uuid) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "secret123",
                    "name": "Test User"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        let token = body["token"].as_str().unwrap().to_string();
        let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, id)
    }

    /// A token carrying the admin role for a freshly registered user.
    pub async fn admin_token(&self) -> String {
        let email = format!("admin-{}@example.com", Uuid::new_v4());
        let (_, id) = self.register(&email).await;
        self.state
            .jwt_service
            .generate_token(id, &email, UserRole::Admin)
            .unwrap()
    }

    pub async fn create_account(&self, token: &str, name: &str, initial: Value) -> String {
        let (status, body) = self
            .post(
                "/api/accounts",
                token,
                json!({ "name": name, "type": "checking", "initial_balance": initial }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "account failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_category(&self, token: &str, name: &str, kind: &str) -> String {
        let (status, body) = self
            .post("/api/categories", token, json!({ "name": name, "type": kind }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "category failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a transaction and returns the response body.
    pub async fn create_transaction(&self, token: &str, body: Value) -> Value {
        let (status, body) = self.post("/api/transactions", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "transaction failed: {body}");
        body
    }

    pub async fn balance(&self, token: &str, account_id: &str) -> Value {
        let (status, body) = self.get(&format!("/api/accounts/{account_id}"), token).await;
        assert_eq!(status, StatusCode::OK);
        body["balance"].clone()
    }
}
