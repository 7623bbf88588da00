//! Administrator authentication
//!
//! - [`password`]: bcrypt hashing on the blocking pool
//! - [`token`]: HS256 bearer tokens carrying the account role

pub mod password;
pub mod token;

pub use token::{AuthConfig, Claims, TokenIssuer};

/// Authentication error type
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
}
