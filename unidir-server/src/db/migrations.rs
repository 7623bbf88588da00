//! Idempotent schema setup
//!
//! Constraint names are Postgres defaults (`<table>_<column>_key`,
//! `<table>_<column>_fkey`); `DbError::classify` maps them to messages.

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        department_id SERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS faculty (
        faculty_id SERIAL PRIMARY KEY,
        department_id INTEGER REFERENCES departments(department_id) ON DELETE SET NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        title TEXT,
        bio TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS faculty_departments (
        faculty_id INTEGER NOT NULL REFERENCES faculty(faculty_id) ON DELETE CASCADE,
        department_id INTEGER NOT NULL REFERENCES departments(department_id) ON DELETE CASCADE,
        PRIMARY KEY (faculty_id, department_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS department_images (
        image_id SERIAL PRIMARY KEY,
        department_id INTEGER NOT NULL REFERENCES departments(department_id) ON DELETE CASCADE,
        image_url TEXT NOT NULL,
        alt_text TEXT,
        is_primary BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS faculty_images (
        image_id SERIAL PRIMARY KEY,
        faculty_id INTEGER NOT NULL REFERENCES faculty(faculty_id) ON DELETE CASCADE,
        image_url TEXT NOT NULL,
        alt_text TEXT,
        is_profile BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS department_contacts (
        contact_id SERIAL PRIMARY KEY,
        department_id INTEGER NOT NULL UNIQUE REFERENCES departments(department_id) ON DELETE CASCADE,
        email TEXT,
        phone TEXT,
        office_location TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS faculty_contacts (
        contact_id SERIAL PRIMARY KEY,
        faculty_id INTEGER NOT NULL UNIQUE REFERENCES faculty(faculty_id) ON DELETE CASCADE,
        email TEXT,
        phone TEXT,
        office_location TEXT,
        website_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id SERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'visitor' CHECK (role IN ('visitor', 'administrator')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_faculty_department ON faculty(department_id)",
    "CREATE INDEX IF NOT EXISTS idx_faculty_name ON faculty(last_name, first_name)",
    "CREATE INDEX IF NOT EXISTS idx_faculty_departments_department ON faculty_departments(department_id)",
    "CREATE INDEX IF NOT EXISTS idx_department_images_parent ON department_images(department_id)",
    "CREATE INDEX IF NOT EXISTS idx_faculty_images_parent ON faculty_images(faculty_id)",
];

/// Tables in dependency order, children first; used by the seeder to clear data.
pub const TABLES: &[&str] = &[
    "faculty_departments",
    "faculty_contacts",
    "faculty_images",
    "department_contacts",
    "department_images",
    "faculty",
    "departments",
    "users",
];

/// Create every table and index that does not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("running directory migrations");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(statements = STATEMENTS.len(), "migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_is_created_and_cleared() {
        for table in TABLES {
            let create = format!("CREATE TABLE IF NOT EXISTS {table} (");
            assert!(
                STATEMENTS.iter().any(|s| s.contains(&create)),
                "no CREATE for {table}"
            );
        }
    }

    #[test]
    fn statements_are_idempotent() {
        assert!(STATEMENTS.iter().all(|s| s.contains("IF NOT EXISTS")));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn runs_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        run(&pool).await.unwrap();
        run(&pool).await.unwrap();
    }
}
