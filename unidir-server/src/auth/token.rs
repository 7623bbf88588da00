//! Signed bearer tokens (HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::db::User;
use crate::models::Role;

const ISSUER: &str = "unidir";

/// Authentication settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string, per the registered claim
    pub sub: String,
    pub user_id: i32,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Issues and verifies tokens with one shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            iss: ISSUER.to_string(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Validate signature, expiry and issuer.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 3,
            email: "admin@fsu.edu".into(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn issuer(secret: &str, ttl_hours: i64) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: secret.into(),
            token_ttl_hours: ttl_hours,
            bcrypt_cost: 4,
        })
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = issuer("secret", 1);
        let token = issuer.issue(&user(Role::Administrator)).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "3");
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.email, "admin@fsu.edu");
        assert!(claims.is_admin());
        assert_eq!(claims.iss, "unidir");
    }

    #[test]
    fn visitor_claims_are_not_admin() {
        let issuer = issuer("secret", 1);
        let token = issuer.issue(&user(Role::Visitor)).unwrap();
        assert!(!issuer.verify(&token).unwrap().is_admin());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issuer("secret", 1).issue(&user(Role::Administrator)).unwrap();
        assert!(issuer("other", 1).verify(&token).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Past the default 60s leeway
        let issuer = issuer("secret", -1);
        let token = issuer.issue(&user(Role::Administrator)).unwrap();
        assert!(matches!(issuer.verify(&token), Err(AuthError::Token(_))));
    }

    #[test]
    fn garbage_rejected() {
        assert!(issuer("secret", 1).verify("not.a.token").is_err());
    }
}
