//! Faculty repository
//!
//! Mirrors the department repository: joined reads, transactional create,
//! and a partial update whose dependents (profile image, contact, junction
//! row) commit with the column change.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::contacts::{self, ContactKind};
use super::departments::{DepartmentRecord, DepartmentRepo};
use super::images::{ImageKind, ImageRepo, NewImage};
use super::memberships::{self, DepartmentSummary, MembershipRepo};
use crate::db::error::DbError;
use crate::db::update::PartialUpdate;
use crate::models::{ContactInfo, PersonName, ValidationError};

const RECORD_SELECT: &str = r#"
    SELECT
        f.faculty_id AS id,
        f.first_name,
        f.last_name,
        f.title,
        f.bio,
        f.department_id,
        (SELECT fi.image_url FROM faculty_images fi
         WHERE fi.faculty_id = f.faculty_id AND fi.is_profile = TRUE
         ORDER BY fi.image_id LIMIT 1) AS profile_image,
        fc.email AS contact_email,
        fc.phone AS contact_phone,
        fc.office_location AS contact_office_location,
        fc.website_url AS contact_website_url,
        d.name AS department_name,
        f.created_at,
        f.updated_at
    FROM faculty f
    LEFT JOIN faculty_contacts fc ON fc.faculty_id = f.faculty_id
    LEFT JOIN departments d ON d.department_id = f.department_id
"#;

/// Faculty member with profile image, contact and primary department name
#[derive(Debug, Clone, FromRow)]
pub struct FacultyRecord {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub department_id: Option<i32>,
    pub profile_image: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_office_location: Option<String>,
    pub contact_website_url: Option<String>,
    pub department_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FacultyRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            email: self.contact_email.clone(),
            phone: self.contact_phone.clone(),
            office_location: self.contact_office_location.clone(),
            website_url: self.contact_website_url.clone(),
        }
    }
}

/// Faculty record plus its primary department and all memberships
#[derive(Debug, Clone)]
pub struct FacultyDetail {
    pub record: FacultyRecord,
    pub department: Option<DepartmentRecord>,
    pub departments: Vec<DepartmentSummary>,
}

/// Deleted faculty summary
#[derive(Debug, Clone, FromRow)]
pub struct DeletedFaculty {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Faculty member to create
#[derive(Debug, Clone)]
pub struct NewFaculty {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub title: String,
    pub bio: String,
    pub department_id: Option<i32>,
    /// Stored as the profile image when non-empty
    pub profile_image: String,
    /// Stored when any field is non-empty
    pub contact: ContactInfo,
}

/// Sparse faculty update; `None` means "leave unchanged"
#[derive(Debug, Clone, Default)]
pub struct FacultyChanges {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub title: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub department_id: Option<Option<i32>>,
    pub profile_image: Option<Option<String>>,
    pub contact: Option<ContactInfo>,
}

impl FacultyChanges {
    fn columns(&self) -> PartialUpdate {
        let mut update = PartialUpdate::new("faculty", "faculty_id");
        update
            .set_present("first_name", self.first_name.as_ref().map(|n| n.as_str().to_owned()))
            .set_present("last_name", self.last_name.as_ref().map(|n| n.as_str().to_owned()))
            .set_present("title", self.title.clone())
            .set_present("bio", self.bio.clone())
            .set_present("department_id", self.department_id);
        update
    }

    fn has_dependents(&self) -> bool {
        self.profile_image.is_some() || self.contact.is_some()
    }
}

/// Escape LIKE metacharacters and wrap in `%…%`.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Faculty repository
pub struct FacultyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FacultyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All faculty ordered by last then first name, optionally filtered by a
    /// case-insensitive substring of either name.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<FacultyRecord>, DbError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let rows = sqlx::query_as(&format!(
            "{RECORD_SELECT}
            WHERE $1::text IS NULL OR f.first_name ILIKE $1::text OR f.last_name ILIKE $1::text
            ORDER BY f.last_name ASC, f.first_name ASC"
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One faculty member by id.
    pub async fn get(&self, id: i32) -> Result<FacultyRecord, DbError> {
        sqlx::query_as(&format!("{RECORD_SELECT} WHERE f.faculty_id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("faculty", id))
    }

    /// Faculty record with its primary department expanded and all memberships.
    pub async fn detail(&self, id: i32) -> Result<FacultyDetail, DbError> {
        let record = self.get(id).await?;

        let department = match record.department_id {
            Some(department_id) => Some(DepartmentRepo::new(self.pool).get(department_id).await?),
            None => None,
        };
        let departments = MembershipRepo::new(self.pool).departments_for(id).await?;

        Ok(FacultyDetail {
            record,
            department,
            departments,
        })
    }

    /// Create a faculty member with contact, profile image and membership (atomic).
    ///
    /// An unknown `department_id` fails with `InvalidReference`.
    pub async fn create(&self, new: NewFaculty) -> Result<FacultyRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO faculty (first_name, last_name, title, bio, department_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING faculty_id
            "#,
        )
        .bind(new.first_name.as_str())
        .bind(new.last_name.as_str())
        .bind(&new.title)
        .bind(&new.bio)
        .bind(new.department_id)
        .fetch_one(&mut *tx)
        .await?;

        if !new.contact.is_blank() {
            contacts::upsert_in(&mut tx, ContactKind::Faculty, id, &new.contact).await?;
        }

        if !new.profile_image.trim().is_empty() {
            let image = NewImage {
                image_url: new.profile_image.trim().to_owned(),
                alt_text: Some(format!(
                    "{} {} profile picture",
                    new.first_name.as_str(),
                    new.last_name.as_str()
                )),
                exclusive: true,
            };
            ImageRepo::new(self.pool, ImageKind::Faculty)
                .add_in(&mut tx, id, image)
                .await?;
        }

        if let Some(department_id) = new.department_id {
            memberships::link_in(&mut tx, id, department_id).await?;
        }

        tx.commit().await?;
        tracing::info!(faculty_id = id, "faculty member created");

        self.get(id).await
    }

    /// Apply a sparse update and return the refreshed record.
    ///
    /// Setting a new primary department also links it in the junction table.
    pub async fn update(&self, id: i32, changes: FacultyChanges) -> Result<FacultyRecord, DbError> {
        let columns = changes.columns();
        if columns.is_empty() && !changes.has_dependents() {
            return Err(ValidationError::NothingToUpdate.into());
        }

        let mut tx = self.pool.begin().await?;

        let found: Option<(i32,)> = if columns.is_empty() {
            sqlx::query_as("SELECT faculty_id FROM faculty WHERE faculty_id = $1 FOR NO KEY UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        } else {
            let built = columns.build("faculty_id")?;
            built.query_as(id).fetch_optional(&mut *tx).await?
        };
        if found.is_none() {
            return Err(DbError::not_found("faculty", id));
        }

        if let Some(Some(department_id)) = changes.department_id {
            memberships::link_in(&mut tx, id, department_id).await?;
        }

        if let Some(profile) = &changes.profile_image {
            ImageRepo::new(self.pool, ImageKind::Faculty)
                .replace_exclusive_in(&mut tx, id, profile.as_deref())
                .await?;
        }

        if let Some(contact) = &changes.contact {
            contacts::upsert_in(&mut tx, ContactKind::Faculty, id, contact).await?;
        }

        tx.commit().await?;
        tracing::info!(faculty_id = id, columns = columns.len(), "faculty member updated");

        self.get(id).await
    }

    /// Delete a faculty member; images, contact and memberships cascade.
    pub async fn delete(&self, id: i32) -> Result<DeletedFaculty, DbError> {
        let deleted: Option<DeletedFaculty> = sqlx::query_as(
            r#"
            DELETE FROM faculty
            WHERE faculty_id = $1
            RETURNING faculty_id AS id, first_name, last_name
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let deleted = deleted.ok_or_else(|| DbError::not_found("faculty", id))?;
        tracing::info!(faculty_id = id, "faculty member deleted");
        Ok(deleted)
    }
}
