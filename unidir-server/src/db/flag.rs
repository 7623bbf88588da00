//! Exclusive image flags
//!
//! `department_images.is_primary` and `faculty_images.is_profile` mark one
//! representative image per parent. The schema does not enforce this; every
//! writer goes through [`ExclusiveFlag`], which clears the flag for the whole
//! parent and sets it on one owned row inside a single transaction.
//!
//! Writers for the same parent are serialized on the parent row
//! (`FOR NO KEY UPDATE`). Image inserts only take `KEY SHARE` on that row for
//! their foreign key, so an insert followed by a flag move cannot deadlock
//! against another one. Once the lock is granted, the clear statement sees
//! every image the previous holder committed.

use sqlx::{PgConnection, PgPool};

use super::error::DbError;
use super::repos::images::ImageRow;

/// Table layout of one exclusive flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusiveFlag {
    pub table: &'static str,
    /// Owning table, keyed by `parent_column`
    pub parent_table: &'static str,
    pub parent_column: &'static str,
    pub flag_column: &'static str,
    /// Resource names used in NotFound errors
    pub resource: &'static str,
    pub parent_resource: &'static str,
}

/// Department banner image
pub const DEPARTMENT_PRIMARY: ExclusiveFlag = ExclusiveFlag {
    table: "department_images",
    parent_table: "departments",
    parent_column: "department_id",
    flag_column: "is_primary",
    resource: "department image",
    parent_resource: "department",
};

/// Faculty profile picture
pub const FACULTY_PROFILE: ExclusiveFlag = ExclusiveFlag {
    table: "faculty_images",
    parent_table: "faculty",
    parent_column: "faculty_id",
    flag_column: "is_profile",
    resource: "faculty image",
    parent_resource: "faculty",
};

impl ExclusiveFlag {
    /// Column list that maps either image table onto [`ImageRow`].
    pub fn select_columns(&self) -> String {
        format!(
            "image_id, {} AS parent_id, image_url, alt_text, {} AS flagged",
            self.parent_column, self.flag_column
        )
    }

    fn lock_sql(&self) -> String {
        format!(
            "SELECT 1 FROM {} WHERE {} = $1 FOR NO KEY UPDATE",
            self.parent_table, self.parent_column
        )
    }

    fn clear_sql(&self) -> String {
        format!(
            "UPDATE {} SET {} = FALSE WHERE {} = $1",
            self.table, self.flag_column, self.parent_column
        )
    }

    fn set_sql(&self) -> String {
        format!(
            "UPDATE {} SET {} = TRUE WHERE image_id = $1 AND {} = $2 RETURNING {}",
            self.table,
            self.flag_column,
            self.parent_column,
            self.select_columns()
        )
    }

    /// Make `image_id` the only flagged image of `parent_id`.
    ///
    /// Runs in its own transaction. Fails with `NotFound` (and rolls back)
    /// when the image does not exist or belongs to another parent; any
    /// driver failure rolls back and surfaces as `Transaction`.
    pub async fn set(&self, pool: &PgPool, parent_id: i32, image_id: i32) -> Result<ImageRow, DbError> {
        let mut tx = pool.begin().await.map_err(DbError::Transaction)?;

        match self.set_in(&mut tx, parent_id, image_id).await {
            Ok(row) => {
                tx.commit().await.map_err(DbError::Transaction)?;
                tracing::info!(
                    table = self.table,
                    parent_id,
                    image_id,
                    "exclusive image flag moved"
                );
                Ok(row)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(table = self.table, error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Same as [`set`](Self::set) inside a caller-owned transaction.
    ///
    /// The caller must roll back on error; the clear step has already run.
    pub async fn set_in(
        &self,
        conn: &mut PgConnection,
        parent_id: i32,
        image_id: i32,
    ) -> Result<ImageRow, DbError> {
        self.clear_in(conn, parent_id).await?;

        let row: Option<ImageRow> = sqlx::query_as(&self.set_sql())
            .bind(image_id)
            .bind(parent_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::Transaction)?;

        row.ok_or_else(|| DbError::not_found(self.resource, image_id))
    }

    /// Clear the flag on every image of `parent_id`. Returns rows changed.
    ///
    /// Takes the parent lock first; an unknown parent fails with `NotFound`.
    pub async fn clear_in(&self, conn: &mut PgConnection, parent_id: i32) -> Result<u64, DbError> {
        self.lock_parent(conn, parent_id).await?;

        let result = sqlx::query(&self.clear_sql())
            .bind(parent_id)
            .execute(&mut *conn)
            .await
            .map_err(DbError::Transaction)?;

        Ok(result.rows_affected())
    }

    /// Block until no other transaction is moving this parent's flag.
    async fn lock_parent(&self, conn: &mut PgConnection, parent_id: i32) -> Result<(), DbError> {
        let locked: Option<(i32,)> = sqlx::query_as(&self.lock_sql())
            .bind(parent_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::Transaction)?;

        match locked {
            Some(_) => Ok(()),
            None => Err(DbError::not_found(self.parent_resource, parent_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_statement_checks_ownership() {
        let sql = DEPARTMENT_PRIMARY.set_sql();
        assert!(sql.starts_with("UPDATE department_images SET is_primary = TRUE"));
        assert!(sql.contains("WHERE image_id = $1 AND department_id = $2"));
        assert!(sql.contains("department_id AS parent_id"));
        assert!(sql.contains("is_primary AS flagged"));
    }

    #[test]
    fn clear_statement_targets_every_image_of_parent() {
        // No filter on the flag: rows flagged by a transaction that committed
        // while this one waited must still be cleared
        assert_eq!(
            FACULTY_PROFILE.clear_sql(),
            "UPDATE faculty_images SET is_profile = FALSE WHERE faculty_id = $1"
        );
    }

    #[test]
    fn lock_statement_takes_parent_row() {
        assert_eq!(
            DEPARTMENT_PRIMARY.lock_sql(),
            "SELECT 1 FROM departments WHERE department_id = $1 FOR NO KEY UPDATE"
        );
        assert_eq!(
            FACULTY_PROFILE.lock_sql(),
            "SELECT 1 FROM faculty WHERE faculty_id = $1 FOR NO KEY UPDATE"
        );
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p unidir-server -- --ignored

    async fn fixture() -> (PgPool, i32, i32, i32) {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");

        let (department_id,): (i32,) = sqlx::query_as(
            "INSERT INTO departments (name) VALUES ('flag-test-' || gen_random_uuid()) RETURNING department_id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let (primary,): (i32,) = sqlx::query_as(
            "INSERT INTO department_images (department_id, image_url, is_primary) VALUES ($1, 'a.png', TRUE) RETURNING image_id",
        )
        .bind(department_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        let (other,): (i32,) = sqlx::query_as(
            "INSERT INTO department_images (department_id, image_url, is_primary) VALUES ($1, 'b.png', FALSE) RETURNING image_id",
        )
        .bind(department_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        (pool, department_id, primary, other)
    }

    async fn flagged(pool: &PgPool, department_id: i32) -> Vec<(i32, bool)> {
        sqlx::query_as(
            "SELECT image_id, is_primary FROM department_images WHERE department_id = $1 ORDER BY image_id",
        )
        .bind(department_id)
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn moves_flag_and_is_idempotent() {
        let (pool, department_id, primary, other) = fixture().await;

        let row = DEPARTMENT_PRIMARY.set(&pool, department_id, other).await.unwrap();
        assert_eq!(row.image_id, other);
        assert!(row.flagged);
        assert_eq!(
            flagged(&pool, department_id).await,
            vec![(primary, false), (other, true)]
        );

        DEPARTMENT_PRIMARY.set(&pool, department_id, other).await.unwrap();
        assert_eq!(
            flagged(&pool, department_id).await,
            vec![(primary, false), (other, true)]
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn foreign_image_is_rejected_and_rolled_back() {
        let (pool, department_id, primary, other) = fixture().await;
        let (stranger_department, stranger_image, _) = {
            let (_, d, i, o) = fixture().await;
            (d, i, o)
        };

        let err = DEPARTMENT_PRIMARY
            .set(&pool, department_id, stranger_image)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // Nothing committed for either parent
        assert_eq!(
            flagged(&pool, department_id).await,
            vec![(primary, true), (other, false)]
        );
        assert!(flagged(&pool, stranger_department)
            .await
            .iter()
            .any(|(id, flag)| *id == stranger_image && *flag));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_image_is_not_found() {
        let (pool, department_id, primary, _) = fixture().await;

        let err = DEPARTMENT_PRIMARY
            .set(&pool, department_id, i32::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(flagged(&pool, department_id)
            .await
            .contains(&(primary, true)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn overlapping_setters_leave_one_flag() {
        let (pool, department_id, primary, other) = fixture().await;
        let (third,): (i32,) = sqlx::query_as(
            "INSERT INTO department_images (department_id, image_url) VALUES ($1, 'c.png') RETURNING image_id",
        )
        .bind(department_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        // First writer moves the flag but has not committed yet
        let mut tx = pool.begin().await.unwrap();
        DEPARTMENT_PRIMARY
            .set_in(&mut tx, department_id, other)
            .await
            .unwrap();

        let second = tokio::spawn({
            let pool = pool.clone();
            async move { DEPARTMENT_PRIMARY.set(&pool, department_id, third).await }
        });

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        assert!(!second.is_finished(), "second setter must wait for the parent lock");

        tx.commit().await.unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(
            flagged(&pool, department_id).await,
            vec![(primary, false), (other, false), (third, true)]
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn clear_on_unknown_parent_is_not_found() {
        let (pool, _, _, _) = fixture().await;
        let mut conn = pool.acquire().await.unwrap();

        let err = DEPARTMENT_PRIMARY
            .clear_in(&mut conn, i32::MAX)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                resource: "department",
                ..
            }
        ));
    }
}
