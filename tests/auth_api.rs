//! Registration, Verification and Login Tests
//!
//! Exercised through the HTTP router:
//! - First account bootstraps an ADMIN; later accounts start ANONYMOUS
//! - Email verification upgrades the account and unlocks login
//! - Login checks run in order: unknown, locked, unverified, password

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, PASSWORD};

// =============================================================================
// Registration
// =============================================================================

/// The first registered account is a verified ADMIN and gets no email.
#[tokio::test]
async fn test_first_registration_bootstraps_admin() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({"email": "Admin@Example.com", "password": PASSWORD}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ADMIN");
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["email_verified"], true);
    assert!(body.get("hashed_password").is_none());
    assert_eq!(app.emails.sent_count(), 0);
}

/// Later registrations start ANONYMOUS, unverified, with a verification email.
#[tokio::test]
async fn test_later_registration_is_anonymous_and_emailed() {
    let app = TestApp::new();
    app.bootstrap_admin().await;

    let (status, body) = app
        .register(json!({
            "email": "john.doe@example.com",
            "password": PASSWORD,
            "nickname": "john_doe_123",
            "first_name": "John",
        }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ANONYMOUS");
    assert_eq!(body["email_verified"], false);
    assert_eq!(body["nickname"], "john_doe_123");

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "john.doe@example.com");
    assert!(sent[0].subject.contains("Verify Your Email Address"));
    assert!(sent[0].body.contains("Hi John"));
    assert!(app.verification_path("john.doe@example.com").is_some());
}

/// A nickname is generated when none is given.
#[tokio::test]
async fn test_registration_generates_nickname() {
    let app = TestApp::new();

    let (_, body) = app
        .register(json!({"email": "nonick@example.com", "password": PASSWORD}))
        .await;

    let nickname = body["nickname"].as_str().unwrap();
    assert!(nickname.len() >= 3);
}

/// Duplicate email or nickname is a 400 with a specific message.
#[tokio::test]
async fn test_registration_rejects_duplicates() {
    let app = TestApp::new();
    app.register(json!({"email": "taken@example.com", "password": PASSWORD, "nickname": "taken_nick"}))
        .await;

    let (status, body) = app
        .register(json!({"email": "TAKEN@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already exists");

    let (status, body) = app
        .register(json!({"email": "other@example.com", "password": PASSWORD, "nickname": "taken_nick"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Nickname already exists");
}

/// Malformed fields are reported as 422.
#[tokio::test]
async fn test_registration_validation_errors() {
    let app = TestApp::new();

    let (status, _) = app
        .register(json!({"email": "notanemail", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .register(json!({"email": "short@example.com", "password": "abc234"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "String should have at least 8 characters");

    let (status, _) = app
        .register(json!({"email": "nick@example.com", "password": PASSWORD, "nickname": "a b"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .register(json!({
            "email": "url@example.com",
            "password": PASSWORD,
            "github_profile_url": "ftp://github.com/x",
        }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.register(json!({"password": PASSWORD})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was stored
    assert_eq!(app.emails.sent_count(), 0);
}

// =============================================================================
// Email Verification
// =============================================================================

/// Following the emailed link verifies the account and allows login.
#[tokio::test]
async fn test_verification_link_enables_login() {
    let app = TestApp::new();
    app.bootstrap_admin().await;
    app.register(json!({"email": "verify@example.com", "password": PASSWORD}))
        .await;

    let (status, body) = app.login("verify@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Email not verified");

    let path = app.verification_path("verify@example.com").unwrap();
    let (status, _) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::OK);

    // Link is single-use
    let (status, _) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token = app.login_token("verify@example.com", PASSWORD).await;
    let claims = app.jwt.validate_token(&token).unwrap();
    assert_eq!(claims.role.as_str(), "AUTHENTICATED");
}

/// A wrong token or unknown user is a 400.
#[tokio::test]
async fn test_invalid_verification_token() {
    let app = TestApp::new();
    app.bootstrap_admin().await;
    let (_, body) = app
        .register(json!({"email": "verify@example.com", "password": PASSWORD}))
        .await;
    let id = body["id"].as_str().unwrap();

    let (status, body) = app.get(&format!("/verify-email/{id}/not-the-token"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid or expired verification token");

    let (status, _) = app
        .get(&format!("/verify-email/{}/whatever", uuid::Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Login
// =============================================================================

/// Successful login returns a bearer token.
#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.bootstrap_admin().await;

    let (status, body) = app.login("ADMIN@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().unwrap().len() > 20);
}

/// Unknown email and wrong password give the same 401.
#[tokio::test]
async fn test_login_bad_credentials() {
    let app = TestApp::new();
    app.bootstrap_admin().await;

    let (status, body) = app.login("nonexistentuser@here.edu", "IncorrectPassword123!").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect email or password.");

    let (status, body) = app.login("admin@example.com", "IncorrectPassword123!").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect email or password.");
}

/// Three wrong passwords lock the account, even against the right one.
#[tokio::test]
async fn test_login_lockout() {
    let app = TestApp::new();
    app.bootstrap_admin().await;

    for _ in 0..3 {
        let (status, _) = app.login("admin@example.com", "WrongPassword!").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = app.login("admin@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Account locked due to too many failed login attempts."
    );
}

/// A successful login resets the failure counter.
#[tokio::test]
async fn test_successful_login_resets_failures() {
    let app = TestApp::new();
    app.bootstrap_admin().await;

    for _ in 0..2 {
        app.login("admin@example.com", "WrongPassword!").await;
    }
    app.login_token("admin@example.com", PASSWORD).await;
    for _ in 0..2 {
        app.login("admin@example.com", "WrongPassword!").await;
    }

    let (status, _) = app.login("admin@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}

/// Passwords with form-reserved characters survive URL encoding.
#[tokio::test]
async fn test_login_password_with_reserved_characters() {
    let app = TestApp::new();
    let admin = app.bootstrap_admin().await;
    let password = "P@ss&word=+ 100%;#?/é";

    let (status, _) = app
        .request(
            Method::POST,
            "/users/",
            Some(&admin),
            Some(json!({"email": "symbols@example.com", "password": password})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.login("symbols@example.com", password).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], "bearer");
}

/// A login form missing a field is a 422.
#[tokio::test]
async fn test_login_incomplete_form() {
    let app = TestApp::new();
    let (status, _) = app
        .request(Method::POST, "/login/", None, Some(json!({"username": "x"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Health and Docs
// =============================================================================

#[tokio::test]
async fn test_health_and_openapi() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/users/{user_id}/promote").is_some());
}
