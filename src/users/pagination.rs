//! Offset pagination for the user listing.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::model::UserResponse;
use crate::auth::errors::{AuthError, AuthResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

/// `?skip=&limit=` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Number of users to skip
    #[serde(default)]
    pub skip: usize,
    /// Page size (1-100, larger values are capped)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Reject a zero limit and cap oversize ones
    pub fn normalized(self) -> AuthResult<Self> {
        if self.limit == 0 {
            return Err(AuthError::Validation(
                "limit must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            skip: self.skip,
            limit: self.limit.min(MAX_PAGE_SIZE),
        })
    }
}

/// Navigation links for a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PaginationLinks {
    pub fn build(base: &str, params: PageParams, total: usize) -> Self {
        let PageParams { skip, limit } = params;
        let link = |skip: usize| format!("{base}?skip={skip}&limit={limit}");

        let last_skip = if total == 0 {
            0
        } else {
            ((total - 1) / limit) * limit
        };

        Self {
            self_link: link(skip),
            first: link(0),
            last: link(last_skip),
            next: skip
                .checked_add(limit)
                .filter(|next_skip| *next_skip < total)
                .map(link),
            prev: (skip > 0).then(|| link(skip.saturating_sub(limit))),
        }
    }
}

/// One page of users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: usize,
    /// 1-based page number
    pub page: usize,
    pub size: usize,
    pub links: PaginationLinks,
}

impl UserListResponse {
    pub fn new(items: Vec<UserResponse>, total: usize, params: PageParams, base: &str) -> Self {
        Self {
            size: items.len(),
            items,
            total,
            page: params.skip / params.limit + 1,
            links: PaginationLinks::build(base, params, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_normalization() {
        let zero = PageParams { skip: 0, limit: 0 };
        assert!(zero.normalized().is_err());

        let huge = PageParams { skip: 5, limit: 1000 };
        assert_eq!(huge.normalized().unwrap().limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_links_middle_page() {
        let links = PaginationLinks::build("/users/", PageParams { skip: 10, limit: 10 }, 35);

        assert_eq!(links.self_link, "/users/?skip=10&limit=10");
        assert_eq!(links.first, "/users/?skip=0&limit=10");
        assert_eq!(links.last, "/users/?skip=30&limit=10");
        assert_eq!(links.next.as_deref(), Some("/users/?skip=20&limit=10"));
        assert_eq!(links.prev.as_deref(), Some("/users/?skip=0&limit=10"));
    }

    #[test]
    fn test_links_single_page() {
        let links = PaginationLinks::build("/users/", PageParams::default(), 3);
        assert!(links.next.is_none());
        assert!(links.prev.is_none());
        assert_eq!(links.last, links.first);

        let empty = PaginationLinks::build("/users/", PageParams::default(), 0);
        assert_eq!(empty.last, "/users/?skip=0&limit=10");
    }

    #[test]
    fn test_links_past_the_end() {
        let params = PageParams {
            skip: usize::MAX,
            limit: 10,
        };
        let links = PaginationLinks::build("/users/", params, 3);

        assert!(links.next.is_none());
        assert_eq!(
            links.prev,
            Some(format!("/users/?skip={}&limit=10", usize::MAX - 10))
        );
        assert_eq!(links.last, "/users/?skip=0&limit=10");

        let page = UserListResponse::new(vec![], 3, params, "/users/");
        assert_eq!(page.page, usize::MAX / 10 + 1);
    }

    #[test]
    fn test_page_number() {
        let page = UserListResponse::new(vec![], 50, PageParams { skip: 20, limit: 10 }, "/users/");
        assert_eq!(page.page, 3);
        assert_eq!(page.size, 0);
        assert_eq!(page.total, 50);

        let json = serde_json::to_value(&page).unwrap();
        assert!(json["links"].get("self").is_some());
    }
}
