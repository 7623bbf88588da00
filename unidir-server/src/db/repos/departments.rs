//! Department repository
//!
//! - reads: one query joining the contact and the primary image (no N+1)
//! - create: department + contact + banner in one transaction
//! - update: partial column update + dependent upserts in one transaction

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::contacts::{self, ContactKind};
use super::images::{ImageKind, ImageRepo, NewImage};
use crate::db::error::DbError;
use crate::db::update::PartialUpdate;
use crate::models::{ContactInfo, DepartmentName, ValidationError};

const RECORD_SELECT: &str = r#"
    SELECT
        d.department_id AS id,
        d.name,
        d.description,
        (SELECT di.image_url FROM department_images di
         WHERE di.department_id = d.department_id AND di.is_primary = TRUE
         ORDER BY di.image_id LIMIT 1) AS banner_image,
        dc.email AS contact_email,
        dc.phone AS contact_phone,
        dc.office_location AS contact_office_location,
        d.created_at,
        d.updated_at
    FROM departments d
    LEFT JOIN department_contacts dc ON dc.department_id = d.department_id
"#;

/// Department with its banner image and contact
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub banner_image: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_office_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DepartmentRecord {
    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            email: self.contact_email.clone(),
            phone: self.contact_phone.clone(),
            office_location: self.contact_office_location.clone(),
            website_url: None,
        }
    }
}

/// Faculty member listed on a department page
#[derive(Debug, Clone, FromRow)]
pub struct RosterEntry {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub office_location: Option<String>,
    pub website_url: Option<String>,
    pub department_id: Option<i32>,
}

/// Deleted department summary
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeletedDepartment {
    pub id: i32,
    pub name: String,
}

/// Department to create
#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub name: DepartmentName,
    pub description: String,
    /// Stored as the primary image when non-empty
    pub banner_image: String,
    /// Stored when any field is non-empty
    pub contact: ContactInfo,
}

/// Sparse department update; `None` means "leave unchanged"
#[derive(Debug, Clone, Default)]
pub struct DepartmentChanges {
    pub name: Option<DepartmentName>,
    pub description: Option<Option<String>>,
    pub banner_image: Option<Option<String>>,
    pub contact: Option<ContactInfo>,
}

impl DepartmentChanges {
    fn columns(&self) -> PartialUpdate {
        let mut update = PartialUpdate::new("departments", "department_id");
        update
            .set_present("name", self.name.as_ref().map(|n| n.as_str().to_owned()))
            .set_present("description", self.description.clone());
        update
    }

    fn has_dependents(&self) -> bool {
        self.banner_image.is_some() || self.contact.is_some()
    }
}

/// Department repository
pub struct DepartmentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DepartmentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All departments ordered by name.
    pub async fn list(&self) -> Result<Vec<DepartmentRecord>, DbError> {
        let rows = sqlx::query_as(&format!("{RECORD_SELECT} ORDER BY d.name ASC"))
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// One department by id.
    pub async fn get(&self, id: i32) -> Result<DepartmentRecord, DbError> {
        sqlx::query_as(&format!("{RECORD_SELECT} WHERE d.department_id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("department", id))
    }

    /// Faculty whose primary department is `id`, ordered by name.
    pub async fn roster(&self, id: i32) -> Result<Vec<RosterEntry>, DbError> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                f.faculty_id AS id,
                f.first_name,
                f.last_name,
                f.title,
                f.bio,
                (SELECT fi.image_url FROM faculty_images fi
                 WHERE fi.faculty_id = f.faculty_id AND fi.is_profile = TRUE
                 ORDER BY fi.image_id LIMIT 1) AS profile_image,
                fc.email,
                fc.phone,
                fc.office_location,
                fc.website_url,
                f.department_id
            FROM faculty f
            LEFT JOIN faculty_contacts fc ON fc.faculty_id = f.faculty_id
            WHERE f.department_id = $1
            ORDER BY f.last_name, f.first_name
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a department with optional contact and banner (atomic).
    pub async fn create(&self, new: NewDepartment) -> Result<DepartmentRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO departments (name, description) VALUES ($1, $2) RETURNING department_id",
        )
        .bind(new.name.as_str())
        .bind(&new.description)
        .fetch_one(&mut *tx)
        .await?;

        if !new.contact.is_blank() {
            contacts::upsert_in(&mut tx, ContactKind::Department, id, &new.contact).await?;
        }

        if !new.banner_image.trim().is_empty() {
            let image = NewImage {
                image_url: new.banner_image.trim().to_owned(),
                alt_text: Some(format!("{} banner", new.name.as_str())),
                exclusive: true,
            };
            ImageRepo::new(self.pool, ImageKind::Department)
                .add_in(&mut tx, id, image)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(department_id = id, name = new.name.as_str(), "department created");

        self.get(id).await
    }

    /// Apply a sparse update and return the refreshed record.
    ///
    /// Column changes, banner replacement and contact upsert commit together.
    /// An unknown id fails with `NotFound` before any dependent write.
    pub async fn update(&self, id: i32, changes: DepartmentChanges) -> Result<DepartmentRecord, DbError> {
        let columns = changes.columns();
        if columns.is_empty() && !changes.has_dependents() {
            return Err(ValidationError::NothingToUpdate.into());
        }

        let mut tx = self.pool.begin().await?;

        let found: Option<(i32,)> = if columns.is_empty() {
            sqlx::query_as("SELECT department_id FROM departments WHERE department_id = $1 FOR NO KEY UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        } else {
            let built = columns.build("department_id")?;
            built.query_as(id).fetch_optional(&mut *tx).await?
        };
        if found.is_none() {
            return Err(DbError::not_found("department", id));
        }

        if let Some(banner) = &changes.banner_image {
            ImageRepo::new(self.pool, ImageKind::Department)
                .replace_exclusive_in(&mut tx, id, banner.as_deref())
                .await?;
        }

        if let Some(contact) = &changes.contact {
            contacts::upsert_in(&mut tx, ContactKind::Department, id, contact).await?;
        }

        tx.commit().await?;
        tracing::info!(department_id = id, columns = columns.len(), "department updated");

        self.get(id).await
    }

    /// Delete a department; images and contact cascade, faculty keep a NULL department.
    pub async fn delete(&self, id: i32) -> Result<DeletedDepartment, DbError> {
        let deleted: Option<DeletedDepartment> = sqlx::query_as(
            "DELETE FROM departments WHERE department_id = $1 RETURNING department_id AS id, name",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let deleted = deleted.ok_or_else(|| DbError::not_found("department", id))?;
        tracing::info!(department_id = id, "department deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changes_have_nothing_to_do() {
        let changes = DepartmentChanges::default();
        assert!(changes.columns().is_empty());
        assert!(!changes.has_dependents());
    }

    #[test]
    fn banner_alone_counts_as_dependent_change() {
        let changes = DepartmentChanges {
            banner_image: Some(Some(String::new())),
            ..Default::default()
        };
        assert!(changes.columns().is_empty());
        assert!(changes.has_dependents());
    }

    #[test]
    fn columns_only_include_present_fields() {
        let changes = DepartmentChanges {
            description: Some(Some("Updated".into())),
            ..Default::default()
        };
        let columns = changes.columns();
        assert_eq!(columns.columns().collect::<Vec<_>>(), vec!["description"]);
    }

    #[tokio::test]
    async fn nothing_to_update_fails_before_touching_db() {
        // A lazy pool never connects, so success proves no statement ran
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let err = DepartmentRepo::new(&pool)
            .update(1, DepartmentChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::NothingToUpdate)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_id_is_not_found_without_dependent_writes() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let changes = DepartmentChanges {
            description: Some(Some("ghost".into())),
            contact: Some(ContactInfo {
                email: Some("ghost@fsu.edu".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = DepartmentRepo::new(&pool)
            .update(99_999, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM department_contacts WHERE department_id = 99999")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }
}
