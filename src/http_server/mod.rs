//! # Roster HTTP Server
//!
//! axum API for the user service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/register/`, `/login/`, `/verify-email/{user_id}/{token}` - Public account flows
//! - `/users/*` - User administration, promotion and self-service profile
//! - `/docs`, `/openapi.json` - API documentation

pub mod auth_routes;
pub mod config;
pub mod doc;
pub mod errors;
pub mod observability_routes;
pub mod server;
pub mod state;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_router, HttpServer};
pub use state::{AppState, CurrentUser};
