//! User listing endpoints (administrators only)

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidPath};
use crate::http::server::AppState;

/// GET /users - all accounts, newest first
async fn list_users(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users))
}

/// GET /users/{id}
async fn get_user(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(Json(user))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
}
