//! Faculty ↔ department junction (`faculty_departments`)

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::db::error::DbError;

/// Department as seen from a faculty member's memberships
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DepartmentSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Membership repository
pub struct MembershipRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MembershipRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Departments a faculty member belongs to, ordered by name.
    pub async fn departments_for(&self, faculty_id: i32) -> Result<Vec<DepartmentSummary>, DbError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM faculty WHERE faculty_id = $1)")
                .bind(faculty_id)
                .fetch_one(self.pool)
                .await?;
        if !exists {
            return Err(DbError::not_found("faculty", faculty_id));
        }

        let rows = sqlx::query_as(
            r#"
            SELECT d.department_id AS id, d.name, d.description
            FROM faculty_departments fd
            JOIN departments d ON d.department_id = fd.department_id
            WHERE fd.faculty_id = $1
            ORDER BY d.name
            "#,
        )
        .bind(faculty_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Link a faculty member to a department. Returns false if already linked.
    pub async fn link(&self, faculty_id: i32, department_id: i32) -> Result<bool, DbError> {
        let mut conn = self.pool.acquire().await?;
        let created = link_in(&mut conn, faculty_id, department_id).await?;
        if created {
            tracing::info!(faculty_id, department_id, "faculty linked to department");
        }
        Ok(created)
    }

    /// Remove a link. Fails with `NotFound` when it does not exist.
    pub async fn unlink(&self, faculty_id: i32, department_id: i32) -> Result<(), DbError> {
        let result = sqlx::query(
            "DELETE FROM faculty_departments WHERE faculty_id = $1 AND department_id = $2",
        )
        .bind(faculty_id)
        .bind(department_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "faculty department link",
                format!("{faculty_id}/{department_id}"),
            ));
        }
        Ok(())
    }
}

/// Idempotent link inside a caller-owned transaction.
pub async fn link_in(conn: &mut PgConnection, faculty_id: i32, department_id: i32) -> Result<bool, DbError> {
    let result = sqlx::query(
        r#"
        INSERT INTO faculty_departments (faculty_id, department_id)
        VALUES ($1, $2)
        ON CONFLICT (faculty_id, department_id) DO NOTHING
        "#,
    )
    .bind(faculty_id)
    .bind(department_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn link_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let (department_id,): (i32,) = sqlx::query_as(
            "INSERT INTO departments (name) VALUES ('link-test-' || gen_random_uuid()) RETURNING department_id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let (faculty_id,): (i32,) = sqlx::query_as(
            "INSERT INTO faculty (first_name, last_name) VALUES ('Ann', 'Lee') RETURNING faculty_id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let repo = MembershipRepo::new(&pool);
        assert!(repo.link(faculty_id, department_id).await.unwrap());
        assert!(!repo.link(faculty_id, department_id).await.unwrap());
        assert_eq!(repo.departments_for(faculty_id).await.unwrap().len(), 1);

        repo.unlink(faculty_id, department_id).await.unwrap();
        let err = repo.unlink(faculty_id, department_id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
