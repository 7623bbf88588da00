//! User repository - administrator and visitor accounts
//!
//! Password hashes never leave this module except inside [`Credentials`],
//! which the login path consumes and drops.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::db::error::DbError;
use crate::models::{Email, Role};

/// Public user record
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User record plus stored hash, for credential checks
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

const USER_COLUMNS: &str = "user_id AS id, email, role, created_at, updated_at";

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an account. A taken email fails with `Conflict`.
    pub async fn create(&self, email: &Email, password_hash: &str, role: Role) -> Result<User, DbError> {
        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(user_id = user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Credentials of an administrator, `None` for unknown emails and non-admins.
    pub async fn find_admin_by_email(&self, email: &Email) -> Result<Option<Credentials>, DbError> {
        let row = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1 AND role = $2"
        ))
        .bind(email.as_str())
        .bind(Role::Administrator.as_str())
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Credentials by id, for password changes.
    pub async fn credentials(&self, id: i32) -> Result<Credentials, DbError> {
        sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))
    }

    pub async fn get(&self, id: i32) -> Result<User, DbError> {
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, user_id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_password(&self, id: i32, password_hash: &str) -> Result<User, DbError> {
        let user: Option<User> = sqlx::query_as(&format!(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE user_id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(password_hash)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let user = user.ok_or_else(|| DbError::not_found("user", id))?;
        tracing::info!(user_id = id, "password changed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_without_hash() {
        let user = User {
            id: 1,
            email: "admin@fsu.edu".into(),
            role: Role::Administrator,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "administrator");
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_email_conflicts() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let email = Email::new(&format!("dup-{}@fsu.edu", Utc::now().timestamp_micros())).unwrap();
        let repo = UserRepo::new(&pool);
        repo.create(&email, "hash", Role::Administrator).await.unwrap();

        let err = repo.create(&email, "hash", Role::Administrator).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Conflict {
                message: "email already exists"
            }
        ));

        let found = repo.find_admin_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash");
    }
}
