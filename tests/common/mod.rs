//! Shared harness for HTTP-level tests.
//!
//! Builds the full router over in-memory storage, records outgoing email and
//! audit entries, and drives requests with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use roster::auth::{JwtManager, UserRole};
use roster::config::AppConfig;
use roster::email::MemoryEmailSender;
use roster::http_server::{build_router, AppState};
use roster::observability::MemoryAuditLog;

pub const PASSWORD: &str = "MySuperPassword$1234";

pub struct TestApp {
    pub router: Router,
    pub emails: Arc<MemoryEmailSender>,
    pub audit: Arc<MemoryAuditLog>,
    pub jwt: JwtManager,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::default();
        let emails = Arc::new(MemoryEmailSender::new());
        let audit = Arc::new(MemoryAuditLog::new());
        let state = AppState::new(&config, emails.clone(), audit.clone());

        Self {
            router: build_router(&config.server, state),
            emails,
            audit,
            jwt: JwtManager::new(config.jwt),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    /// JSON request, optionally authenticated
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
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
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn register(&self, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/register/", None, Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let form = serde_urlencoded::to_string([("username", email), ("password", password)]).unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(request).await
    }

    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let (status, body) = self.login(email, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Register the first account (which becomes ADMIN) and log in
    pub async fn bootstrap_admin(&self) -> String {
        let (status, body) = self
            .register(json!({"email": "admin@example.com", "password": PASSWORD}))
            .await;
        assert_eq!(status, StatusCode::OK, "admin registration failed: {body}");
        assert_eq!(body["role"], "ADMIN");
        self.login_token("admin@example.com", PASSWORD).await
    }

    /// Create a pre-verified account through the admin API and log in as it
    pub async fn create_user(&self, admin_token: &str, email: &str, role: UserRole) -> (Uuid, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/users/",
                Some(admin_token),
                Some(json!({"email": email, "password": PASSWORD, "role": role.as_str()})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        (id, self.login_token(email, PASSWORD).await)
    }

    /// Token for an arbitrary identity, signed with the app's key
    pub fn token_for(&self, user_id: Uuid, role: UserRole) -> String {
        self.jwt.generate_access_token(user_id, role).unwrap()
    }

    /// Path of the most recent verification link sent to `email`
    pub fn verification_path(&self, email: &str) -> Option<String> {
        self.emails
            .sent()
            .into_iter()
            .rev()
            .find(|m| m.to == email)
            .and_then(|m| {
                let start = m.body.find("/verify-email/")?;
                Some(
                    m.body[start..]
                        .chars()
                        .take_while(|c| !c.is_whitespace())
                        .collect(),
                )
            })
    }
}
