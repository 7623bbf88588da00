//! Contact repository - one contact row per department or faculty member
//!
//! Writes are upserts keyed on the parent id (`ON CONFLICT (parent) DO UPDATE`),
//! so the one-to-one relation never needs a check-then-insert.

use sqlx::PgConnection;

use crate::db::error::DbError;
use crate::models::ContactInfo;

/// Which contact table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Department,
    Faculty,
}

impl ContactKind {
    fn upsert_sql(&self) -> &'static str {
        match self {
            Self::Department => {
                r#"
                INSERT INTO department_contacts (department_id, email, phone, office_location)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (department_id) DO UPDATE
                SET email = EXCLUDED.email,
                    phone = EXCLUDED.phone,
                    office_location = EXCLUDED.office_location
                "#
            }
            Self::Faculty => {
                r#"
                INSERT INTO faculty_contacts (faculty_id, email, phone, office_location, website_url)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (faculty_id) DO UPDATE
                SET email = EXCLUDED.email,
                    phone = EXCLUDED.phone,
                    office_location = EXCLUDED.office_location,
                    website_url = EXCLUDED.website_url
                "#
            }
        }
    }
}

/// Insert or replace the contact of `parent_id` inside a caller-owned transaction.
///
/// Every field is written as given: omitted fields become NULL.
pub async fn upsert_in(
    conn: &mut PgConnection,
    kind: ContactKind,
    parent_id: i32,
    contact: &ContactInfo,
) -> Result<(), DbError> {
    let mut query = sqlx::query(kind.upsert_sql())
        .bind(parent_id)
        .bind(contact.email.as_deref())
        .bind(contact.phone.as_deref())
        .bind(contact.office_location.as_deref());

    if kind == ContactKind::Faculty {
        query = query.bind(contact.website_url.as_deref());
    }

    query.execute(&mut *conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_upsert_has_four_parameters() {
        let sql = ContactKind::Department.upsert_sql();
        assert!(sql.contains("$4"));
        assert!(!sql.contains("$5"));
        assert!(sql.contains("ON CONFLICT (department_id)"));
        assert!(!sql.contains("RETURNING"));
    }

    #[test]
    fn faculty_upsert_writes_website() {
        let sql = ContactKind::Faculty.upsert_sql();
        assert!(sql.contains("website_url = EXCLUDED.website_url"));
        assert!(sql.contains("ON CONFLICT (faculty_id)"));
    }
}
