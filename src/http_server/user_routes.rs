//! User management routes
//!
//! Everything under `/users/` needs a bearer token. Listing, CRUD and
//! promotion are limited to ADMIN and MANAGER; `update-profile` is open to
//! any authenticated caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use uuid::Uuid;

use super::errors::{ApiResult, ErrorResponse, ValidatedJson, ValidatedQuery};
use super::state::{AppState, CurrentUser};
use crate::users::{
    CreateUserRequest, PageParams, ProfileFields, UserListResponse, UserResponse, UserUpdate,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", post(create_user).get(list_users))
        .route("/users/update-profile", put(update_profile))
        .route("/users/{user_id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{user_id}/promote", patch(promote_user))
}

#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = CreateUserRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Email or nickname taken", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not ADMIN or MANAGER", body = ErrorResponse),
        (status = 422, description = "Invalid field or role", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.service.create_user(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    params(PageParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not ADMIN or MANAGER", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ApiResult<Json<UserListResponse>> {
    Ok(Json(state.service.list_users(&actor, params)?))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "Account id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 403, description = "Caller is not ADMIN or MANAGER", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(state.service.get_user(&actor, user_id)?.into()))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "Account id")),
    request_body = UserUpdate,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 403, description = "Caller is not ADMIN or MANAGER", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(state.service.update_user(&actor, user_id, update)?.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "Account id")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Caller is not ADMIN or MANAGER", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.service.delete_user(&actor, user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Grant professional status. A fresh promotion emails the user; repeating
/// it returns the user unchanged.
#[utoipa::path(
    patch,
    path = "/users/{user_id}/promote",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "Account id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User is professional", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not ADMIN or MANAGER", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn promote_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.service.promote_user(&actor, user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/users/update-profile",
    tag = "users",
    request_body = ProfileFields,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ValidatedJson(profile): ValidatedJson<ProfileFields>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(state.service.update_profile(&actor, profile)?.into()))
}
