//! Image repository for department banners and faculty portraits
//!
//! Both image tables share one shape; [`ImageKind`] selects the table.
//! Every write that can flag an image routes through [`ExclusiveFlag`].

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::db::error::DbError;
use crate::db::flag::{ExclusiveFlag, DEPARTMENT_PRIMARY, FACULTY_PROFILE};

/// Image record from either image table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageRow {
    pub image_id: i32,
    pub parent_id: i32,
    pub image_url: String,
    pub alt_text: Option<String>,
    /// `is_primary` or `is_profile` depending on the table
    pub flagged: bool,
}

/// Image to insert
#[derive(Debug, Clone)]
pub struct NewImage {
    pub image_url: String,
    pub alt_text: Option<String>,
    /// Make this the parent's primary/profile image
    pub exclusive: bool,
}

/// Which image table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Department,
    Faculty,
}

impl ImageKind {
    pub fn flag(&self) -> ExclusiveFlag {
        match self {
            Self::Department => DEPARTMENT_PRIMARY,
            Self::Faculty => FACULTY_PROFILE,
        }
    }
}

/// Image repository
pub struct ImageRepo<'a> {
    pool: &'a PgPool,
    kind: ImageKind,
}

impl<'a> ImageRepo<'a> {
    pub fn new(pool: &'a PgPool, kind: ImageKind) -> Self {
        Self { pool, kind }
    }

    /// All images of a parent, flagged image first.
    ///
    /// Fails with `NotFound` when the parent does not exist.
    pub async fn list(&self, parent_id: i32) -> Result<Vec<ImageRow>, DbError> {
        let flag = self.kind.flag();
        let mut conn = self.pool.acquire().await?;
        self.ensure_parent(&mut conn, parent_id).await?;

        let rows = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY {} DESC, image_id",
            flag.select_columns(),
            flag.table,
            flag.parent_column,
            flag.flag_column
        ))
        .bind(parent_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Insert an image, flagging it exclusively when requested (atomic).
    pub async fn add(&self, parent_id: i32, image: NewImage) -> Result<ImageRow, DbError> {
        let mut tx = self.pool.begin().await?;
        self.ensure_parent(&mut tx, parent_id).await?;
        let row = self.add_in(&mut tx, parent_id, image).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Insert inside a caller-owned transaction.
    pub async fn add_in(
        &self,
        conn: &mut PgConnection,
        parent_id: i32,
        image: NewImage,
    ) -> Result<ImageRow, DbError> {
        let flag = self.kind.flag();

        // Always inserted unflagged; the flag moves through ExclusiveFlag
        let row: ImageRow = sqlx::query_as(&format!(
            "INSERT INTO {} ({}, image_url, alt_text, {}) VALUES ($1, $2, $3, FALSE) RETURNING {}",
            flag.table,
            flag.parent_column,
            flag.flag_column,
            flag.select_columns()
        ))
        .bind(parent_id)
        .bind(&image.image_url)
        .bind(image.alt_text.as_deref())
        .fetch_one(&mut *conn)
        .await?;

        if image.exclusive {
            return flag.set_in(conn, parent_id, row.image_id).await;
        }
        Ok(row)
    }

    /// Replace the parent's flagged image with a new one.
    ///
    /// Clears the current flag; a non-empty `image_url` is inserted and
    /// flagged, an empty or missing one leaves the parent without a flagged
    /// image. Previous images stay in the gallery.
    pub async fn replace_exclusive_in(
        &self,
        conn: &mut PgConnection,
        parent_id: i32,
        image_url: Option<&str>,
    ) -> Result<Option<ImageRow>, DbError> {
        let flag = self.kind.flag();

        match image_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                let image = NewImage {
                    image_url: url.to_owned(),
                    alt_text: None,
                    exclusive: true,
                };
                self.add_in(conn, parent_id, image).await.map(Some)
            }
            None => {
                flag.clear_in(conn, parent_id).await?;
                Ok(None)
            }
        }
    }

    /// Flag `image_id` as the parent's only primary/profile image.
    pub async fn set_exclusive(&self, parent_id: i32, image_id: i32) -> Result<ImageRow, DbError> {
        self.kind.flag().set(self.pool, parent_id, image_id).await
    }

    /// Delete an image owned by `parent_id`.
    pub async fn delete(&self, parent_id: i32, image_id: i32) -> Result<ImageRow, DbError> {
        let flag = self.kind.flag();

        let row: Option<ImageRow> = sqlx::query_as(&format!(
            "DELETE FROM {} WHERE image_id = $1 AND {} = $2 RETURNING {}",
            flag.table,
            flag.parent_column,
            flag.select_columns()
        ))
        .bind(image_id)
        .bind(parent_id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or_else(|| DbError::not_found(flag.resource, image_id))
    }

    async fn ensure_parent(&self, conn: &mut PgConnection, parent_id: i32) -> Result<(), DbError> {
        let flag = self.kind.flag();
        let (exists,): (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)",
            flag.parent_table, flag.parent_column
        ))
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await?;

        if !exists {
            return Err(DbError::not_found(flag.parent_resource, parent_id));
        }
        Ok(())
    }
}
