//! Database error classification
//!
//! Every `sqlx::Error` entering the repository layer passes through
//! [`DbError::classify`], which reads the driver's structured error kind
//! and constraint name. Call sites never match on SQLSTATE codes.

use sqlx::error::ErrorKind;

use crate::models::ValidationError;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violated
    #[error("conflict: {message}")]
    Conflict { message: &'static str },

    /// Foreign key constraint violated
    #[error("invalid reference: {message}")]
    InvalidReference { message: &'static str },

    /// A flag transaction failed and was rolled back
    #[error("transaction rolled back: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DbError {
    /// Map a driver error onto the taxonomy.
    pub fn classify(err: sqlx::Error) -> Self {
        let Some(db) = err.as_database_error() else {
            return Self::Sqlx(err);
        };
        let kind = db.kind();
        let constraint = db.constraint().map(str::to_owned);

        match kind {
            ErrorKind::UniqueViolation => Self::Conflict {
                message: describe_unique(constraint.as_deref()),
            },
            ErrorKind::ForeignKeyViolation => Self::InvalidReference {
                message: describe_foreign_key(constraint.as_deref()),
            },
            _ => Self::Sqlx(err),
        }
    }

    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        Self::classify(err)
    }
}

/// Client-facing message for a unique constraint (names from `migrations`).
pub fn describe_unique(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("departments_name_key") => "department name already exists",
        Some("users_email_key") => "email already exists",
        Some("department_contacts_department_id_key") => "department already has a contact",
        Some("faculty_contacts_faculty_id_key") => "faculty member already has a contact",
        _ => "record already exists",
    }
}

/// Client-facing message for a foreign key constraint (names from `migrations`).
pub fn describe_foreign_key(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("faculty_department_id_fkey") | Some("faculty_departments_department_id_fkey") => {
            "invalid department_id"
        }
        Some("faculty_departments_faculty_id_fkey")
        | Some("faculty_images_faculty_id_fkey")
        | Some("faculty_contacts_faculty_id_fkey") => "invalid faculty_id",
        Some("department_images_department_id_fkey")
        | Some("department_contacts_department_id_fkey") => "invalid department_id",
        _ => "referenced record does not exist",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_generic() {
        let err = DbError::classify(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(_)));

        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Sqlx(_)));
    }

    #[test]
    fn unique_constraint_messages() {
        assert_eq!(
            describe_unique(Some("departments_name_key")),
            "department name already exists"
        );
        assert_eq!(describe_unique(Some("users_email_key")), "email already exists");
        assert_eq!(describe_unique(None), "record already exists");
    }

    #[test]
    fn foreign_key_messages() {
        assert_eq!(
            describe_foreign_key(Some("faculty_department_id_fkey")),
            "invalid department_id"
        );
        assert_eq!(
            describe_foreign_key(Some("faculty_departments_faculty_id_fkey")),
            "invalid faculty_id"
        );
        assert_eq!(
            describe_foreign_key(Some("something_else")),
            "referenced record does not exist"
        );
    }

    #[test]
    fn validation_passes_through() {
        let err: DbError = ValidationError::NothingToUpdate.into();
        assert_eq!(err.to_string(), "no fields to update");
    }
}
