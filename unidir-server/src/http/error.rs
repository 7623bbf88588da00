//! API error types with IntoResponse
//!
//! Errors are converted to `{error, message}` JSON bodies with the status
//! codes below. 5xx details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violated (409)
    Conflict { message: &'static str },

    /// Foreign key points nowhere (400)
    InvalidReference { message: &'static str },

    /// Missing or invalid credentials (401)
    Unauthorized { message: &'static str },

    /// Authenticated but not an administrator (403)
    Forbidden { reason: &'static str },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "message": e.to_string()
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "message": format!("{} '{}' not found", resource, id)
            }),
            Self::Conflict { message } => json!({
                "error": "conflict",
                "message": message
            }),
            Self::InvalidReference { message } => json!({
                "error": "invalid_reference",
                "message": message
            }),
            Self::Unauthorized { message } => json!({
                "error": "unauthorized",
                "message": message
            }),
            Self::Forbidden { reason } => json!({
                "error": "forbidden",
                "message": reason
            }),
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
            Self::Internal { message } => {
                tracing::error!(%message, "internal error");
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { message } => Self::Conflict { message },
            DbError::InvalidReference { message } => Self::InvalidReference { message },
            DbError::Validation(v) => Self::Validation(v),
            DbError::Sqlx(_) | DbError::Transaction(_) => Self::Database(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::Unauthorized {
                message: "invalid credentials",
            },
            AuthError::Token(_) => Self::Unauthorized {
                message: "invalid or expired token",
            },
            AuthError::WeakPassword { .. } => Self::Validation(ValidationError::InvalidFormat {
                field: "password",
                reason: "must be at least 6 characters",
            }),
            AuthError::Hash(_) | AuthError::Join(_) => Self::Internal {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let (status, body) = body_json(ValidationError::NothingToUpdate.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "no fields to update");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err: ApiError = DbError::NotFound {
            resource: "faculty",
            id: "99999".into(),
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "faculty '99999' not found");
    }

    #[tokio::test]
    async fn conflict_is_409() {
        let err: ApiError = DbError::Conflict {
            message: "department name already exists",
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn invalid_reference_is_400() {
        let err: ApiError = DbError::InvalidReference {
            message: "invalid department_id",
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid department_id");
    }

    #[tokio::test]
    async fn transaction_failure_hides_details() {
        let err: ApiError = DbError::Transaction(sqlx::Error::PoolTimedOut).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "an internal error occurred");
    }

    #[test]
    fn auth_errors_map_to_401() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err: ApiError = AuthError::WeakPassword { min: 6 }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_is_403() {
        let err = ApiError::Forbidden {
            reason: "administrator role required",
        };
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
