//! Administrator registration, login and password change

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{password, AuthError};
use crate::db::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::AdminUser;
use crate::http::server::AppState;
use crate::models::{Email, Role, ValidationError};

/// Register and login request
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn parse(self) -> Result<(Email, String), ValidationError> {
        let email = Email::new(self.email.as_deref().unwrap_or_default())?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::Empty { field: "password" })?;
        Ok((email, password))
    }
}

/// Password change request
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Account plus a fresh bearer token
#[derive(Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

/// POST /admin/register - create an administrator account
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (email, secret) = req.parse()?;
    password::check_strength(&secret)?;

    let hash = password::hash(&secret, state.auth.bcrypt_cost).await?;
    let user = UserRepo::new(&state.pool)
        .create(&email, &hash, Role::Administrator)
        .await?;
    let token = state.tokens.issue(&user)?;

    Ok((StatusCode::CREATED, Json(SessionResponse { user, token })))
}

/// POST /admin/login - exchange administrator credentials for a token
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (email, secret) = req.parse()?;

    let Some(credentials) = UserRepo::new(&state.pool).find_admin_by_email(&email).await? else {
        tracing::warn!(email = email.as_str(), "login for unknown administrator");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !password::verify(&secret, &credentials.password_hash).await? {
        tracing::warn!(user_id = credentials.user.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&credentials.user)?;
    tracing::info!(user_id = credentials.user.id, "administrator logged in");

    Ok(Json(SessionResponse {
        user: credentials.user,
        token,
    }))
}

/// POST /admin/password - change the caller's own password
async fn change_password(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<User>, ApiError> {
    password::check_strength(&req.new_password)?;

    let repo = UserRepo::new(&state.pool);
    let credentials = repo.credentials(claims.user_id).await?;
    if !password::verify(&req.old_password, &credentials.password_hash).await? {
        tracing::warn!(user_id = claims.user_id, "password change with wrong old password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let hash = password::hash(&req.new_password, state.auth.bcrypt_cost).await?;
    let user = repo.update_password(claims.user_id, &hash).await?;
    Ok(Json(user))
}

/// Admin routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/register", post(register))
        .route("/admin/login", post(login))
        .route("/admin/password", post(change_password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_normalized() {
        let req = CredentialsRequest {
            email: Some(" Admin@FSU.edu ".into()),
            password: Some("admin123".into()),
        };
        let (email, password) = req.parse().unwrap();
        assert_eq!(email.as_str(), "admin@fsu.edu");
        assert_eq!(password, "admin123");
    }

    #[test]
    fn missing_fields_are_validation_errors() {
        let req = CredentialsRequest {
            email: None,
            password: Some("x".into()),
        };
        assert_eq!(req.parse().unwrap_err(), ValidationError::Empty { field: "email" });

        let req = CredentialsRequest {
            email: Some("admin@fsu.edu".into()),
            password: Some(String::new()),
        };
        assert_eq!(
            req.parse().unwrap_err(),
            ValidationError::Empty { field: "password" }
        );
    }
}
