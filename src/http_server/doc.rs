//! OpenAPI document served at `/openapi.json` and rendered by Swagger UI at
//! `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::auth_routes::MessageResponse;
use super::errors::ErrorResponse;
use super::observability_routes::HealthResponse;
use crate::auth::{TokenResponse, UserRole};
use crate::users::{
    CreateUserRequest, LoginForm, PaginationLinks, ProfileFields, RegisterRequest,
    UserListResponse, UserResponse, UserUpdate,
};

/// Adds the JWT bearer scheme referenced by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Access token issued by POST /login/."))
            .build();
        components.add_security_scheme("bearer", SecurityScheme::Http(bearer));
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roster user management API",
        description = "Registration, login, role-based user administration and professional promotion."
    ),
    paths(
        crate::http_server::auth_routes::register,
        crate::http_server::auth_routes::login,
        crate::http_server::auth_routes::verify_email,
        crate::http_server::user_routes::create_user,
        crate::http_server::user_routes::list_users,
        crate::http_server::user_routes::get_user,
        crate::http_server::user_routes::update_user,
        crate::http_server::user_routes::delete_user,
        crate::http_server::user_routes::promote_user,
        crate::http_server::user_routes::update_profile,
        crate::http_server::observability_routes::health,
    ),
    components(schemas(
        UserRole,
        RegisterRequest,
        CreateUserRequest,
        UserUpdate,
        ProfileFields,
        LoginForm,
        UserResponse,
        UserListResponse,
        PaginationLinks,
        TokenResponse,
        MessageResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and email verification"),
        (name = "users", description = "User administration and profiles"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
