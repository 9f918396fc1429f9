//! Public account routes: registration, login and email verification

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::{ApiResult, ErrorResponse, ValidatedForm, ValidatedJson};
use super::state::AppState;
use crate::auth::TokenResponse;
use crate::users::{LoginForm, RegisterRequest, UserResponse};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/verify-email/{user_id}/{token}", get(verify_email))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create an account. The first account becomes ADMIN; later ones must
/// verify their email before logging in.
#[utoipa::path(
    post,
    path = "/register/",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Email or nickname taken", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.service.register(request).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/login/",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 400, description = "Account locked", body = ErrorResponse),
        (status = 401, description = "Bad credentials or unverified email", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.service.login(&form.username, &form.password).await?;
    Ok(Json(token))
}

#[utoipa::path(
    get,
    path = "/verify-email/{user_id}/{token}",
    tag = "auth",
    params(
        ("user_id" = Uuid, Path, description = "Account id from the emailed link"),
        ("token" = String, Path, description = "Verification token from the emailed link")
    ),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(Uuid, String)>,
) -> ApiResult<Json<MessageResponse>> {
    state.service.verify_email(user_id, &token)?;
    Ok(Json(MessageResponse {
        message: "Email verified successfully".to_string(),
    }))
}
