//! # Users
//!
//! Account model, storage, validation, promotion and the service tying them
//! together.

pub mod model;
pub mod nickname;
pub mod pagination;
pub mod promotion;
pub mod repository;
pub mod service;
pub mod validation;

pub use model::{CreateUserRequest, LoginForm, ProfileFields, RegisterRequest, User, UserResponse, UserUpdate};
pub use pagination::{PageParams, PaginationLinks, UserListResponse};
pub use promotion::{can_promote, promote, PromotionEvent, PromotionOutcome};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{AccountSettings, UserService};
