//! unidir-server: university directory REST backend
//!
//! Departments, faculty, their images and contacts, and administrator
//! accounts on PostgreSQL, served over axum.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use auth::{AuthConfig, AuthError};
pub use db::{create_pool, create_pool_with_options, DbError};
pub use http::{run_server, ServerConfig, ServerError};
