//! roster - user accounts, roles and professional promotion over HTTP

pub mod auth;
pub mod cli;
pub mod config;
pub mod email;
pub mod http_server;
pub mod observability;
pub mod users;
