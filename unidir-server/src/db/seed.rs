//! Sample directory data
//!
//! Clears every table and loads two accounts, ten departments and their
//! faculty in a single transaction. Images, contacts and memberships go
//! through the same helpers the HTTP handlers use.

use rand::Rng;
use sqlx::PgPool;

use super::error::DbError;
use super::migrations::TABLES;
use super::repos::contacts::{self, ContactKind};
use super::repos::images::{ImageKind, ImageRepo, NewImage};
use super::repos::memberships;
use crate::auth::{password, AuthError};
use crate::models::{ContactInfo, Role};

/// Seed failure
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<sqlx::Error> for SeedError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(DbError::classify(err))
    }
}

/// Row counts written by [`run`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub departments: usize,
    pub faculty: usize,
    pub memberships: usize,
}

const ACCOUNTS: &[(&str, &str, Role)] = &[
    ("visitor@fsu.edu", "visitor123", Role::Visitor),
    ("admin@fsu.edu", "admin123", Role::Administrator),
];

const DEPARTMENTS: &[(&str, &str)] = &[
    ("Computer Science", "The Department of Computer Science offers comprehensive programs in software engineering, artificial intelligence, and computational theory."),
    ("Mathematics", "The Mathematics Department provides rigorous training in pure and applied mathematics, statistics, and mathematical modeling."),
    ("Physics", "The Physics Department explores fundamental principles of the universe through theoretical and experimental research."),
    ("Biology", "The Biology Department studies living organisms and their interactions with the environment at molecular, cellular, and ecosystem levels."),
    ("Chemistry", "The Chemistry Department investigates matter, its properties, composition, and transformations."),
    ("English", "The English Department explores literature, creative writing, rhetoric, and composition across diverse cultural contexts."),
    ("History", "The History Department examines past events, cultures, and societies to understand present and future trends."),
    ("Psychology", "The Psychology Department investigates human behavior, cognition, and mental processes through scientific research."),
    ("Economics", "The Economics Department analyzes production, distribution, and consumption of goods and services in society."),
    ("Business Administration", "The Business Administration Department prepares students for leadership roles in modern organizations."),
];

struct SeedFaculty {
    first_name: &'static str,
    last_name: &'static str,
    title: &'static str,
    bio: &'static str,
    department: &'static str,
}

macro_rules! faculty {
    ($first:literal, $last:literal, $title:literal, $bio:literal, $dept:literal) => {
        SeedFaculty {
            first_name: $first,
            last_name: $last,
            title: $title,
            bio: $bio,
            department: $dept,
        }
    };
}

const FACULTY: &[SeedFaculty] = &[
    faculty!("Sarah", "Johnson", "Professor of Computer Science", "Dr. Johnson specializes in artificial intelligence and machine learning with over 15 years of research experience.", "Computer Science"),
    faculty!("Michael", "Chen", "Associate Professor of Software Engineering", "Dr. Chen focuses on software architecture and distributed systems.", "Computer Science"),
    faculty!("Emily", "Rodriguez", "Assistant Professor of Cybersecurity", "Dr. Rodriguez researches network security and cryptography.", "Computer Science"),
    faculty!("David", "Williams", "Professor of Pure Mathematics", "Dr. Williams is an expert in algebraic topology and category theory.", "Mathematics"),
    faculty!("Lisa", "Anderson", "Associate Professor of Applied Mathematics", "Dr. Anderson works on mathematical modeling and numerical analysis.", "Mathematics"),
    faculty!("Robert", "Thompson", "Professor of Theoretical Physics", "Dr. Thompson researches quantum mechanics and particle physics.", "Physics"),
    faculty!("Jennifer", "Martinez", "Associate Professor of Astrophysics", "Dr. Martinez studies stellar evolution and cosmology.", "Physics"),
    faculty!("James", "Brown", "Professor of Molecular Biology", "Dr. Brown investigates gene expression and cellular mechanisms.", "Biology"),
    faculty!("Maria", "Garcia", "Associate Professor of Ecology", "Dr. Garcia focuses on ecosystem dynamics and conservation biology.", "Biology"),
    faculty!("Daniel", "Lee", "Assistant Professor of Genetics", "Dr. Lee researches population genetics and evolutionary biology.", "Biology"),
    faculty!("Patricia", "Wilson", "Professor of Organic Chemistry", "Dr. Wilson specializes in synthetic organic chemistry and drug design.", "Chemistry"),
    faculty!("Christopher", "Davis", "Associate Professor of Physical Chemistry", "Dr. Davis studies thermodynamics and chemical kinetics.", "Chemistry"),
    faculty!("Amanda", "Taylor", "Professor of American Literature", "Dr. Taylor is an expert in 19th-century American fiction and poetry.", "English"),
    faculty!("Richard", "Moore", "Associate Professor of Creative Writing", "Dr. Moore is an award-winning novelist and poet.", "English"),
    faculty!("Barbara", "Jackson", "Professor of European History", "Dr. Jackson specializes in medieval and Renaissance European history.", "History"),
    faculty!("Kevin", "White", "Associate Professor of American History", "Dr. White researches Civil War and Reconstruction era.", "History"),
    faculty!("Nancy", "Harris", "Professor of Clinical Psychology", "Dr. Harris focuses on cognitive behavioral therapy and mental health treatment.", "Psychology"),
    faculty!("Steven", "Martin", "Associate Professor of Developmental Psychology", "Dr. Martin studies child development and educational psychology.", "Psychology"),
    faculty!("Michelle", "Clark", "Professor of Macroeconomics", "Dr. Clark researches monetary policy and international economics.", "Economics"),
    faculty!("Thomas", "Lewis", "Associate Professor of Behavioral Economics", "Dr. Lewis studies decision-making and market behavior.", "Economics"),
    faculty!("Elizabeth", "Walker", "Professor of Management", "Dr. Walker specializes in organizational behavior and strategic management.", "Business Administration"),
    faculty!("Matthew", "Hall", "Associate Professor of Finance", "Dr. Hall focuses on corporate finance and investment strategies.", "Business Administration"),
    faculty!("Sandra", "Young", "Assistant Professor of Marketing", "Dr. Young researches digital marketing and consumer behavior.", "Business Administration"),
];

/// Probability that a faculty member also joins a second department
const EXTRA_MEMBERSHIP_CHANCE: f64 = 0.3;

fn slug(name: &str) -> String {
    name.split_whitespace().collect()
}

fn phone() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "(850) {}-{}",
        rng.gen_range(100..1000),
        rng.gen_range(1000..10000)
    )
}

/// Building letter cycles A..Z by id.
fn building(id: i32) -> char {
    char::from(b'A' + ((id - 1).rem_euclid(26)) as u8)
}

fn department_contact(id: i32, name: &str) -> ContactInfo {
    ContactInfo {
        email: Some(format!("{}@fsu.edu", slug(name).to_lowercase())),
        phone: Some(phone()),
        office_location: Some(format!("Building {}, Room {}", building(id), 100 + id * 10)),
        website_url: None,
    }
}

fn faculty_contact(faculty_id: i32, department_id: i32, person: &SeedFaculty) -> ContactInfo {
    let prefix = format!(
        "{}.{}",
        person.first_name.to_lowercase(),
        person.last_name.to_lowercase()
    );
    ContactInfo {
        email: Some(format!("{prefix}@fsu.edu")),
        phone: Some(phone()),
        office_location: Some(format!(
            "Building {}, Office {}",
            building(department_id),
            200 + faculty_id
        )),
        website_url: Some(format!("https://www.fsu.edu/faculty/{prefix}")),
    }
}

/// Replace all data with the sample directory.
pub async fn run(pool: &PgPool, bcrypt_cost: u32) -> Result<SeedSummary, SeedError> {
    // Hash before opening the transaction; bcrypt is slow
    let mut accounts = Vec::with_capacity(ACCOUNTS.len());
    for (email, secret, role) in ACCOUNTS {
        accounts.push((*email, password::hash(secret, bcrypt_cost).await?, *role));
    }

    let mut summary = SeedSummary::default();
    let mut tx = pool.begin().await?;

    for table in TABLES {
        sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
    }
    tracing::info!(tables = TABLES.len(), "existing data cleared");

    for (email, hash, role) in &accounts {
        sqlx::query("INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3)")
            .bind(*email)
            .bind(hash)
            .bind(role.as_str())
            .execute(&mut *tx)
            .await?;
        summary.users += 1;
    }

    let department_images = ImageRepo::new(pool, ImageKind::Department);
    let mut departments: Vec<(i32, &str)> = Vec::with_capacity(DEPARTMENTS.len());
    for (name, description) in DEPARTMENTS {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO departments (name, description) VALUES ($1, $2) RETURNING department_id",
        )
        .bind(*name)
        .bind(*description)
        .fetch_one(&mut *tx)
        .await?;

        let seed = slug(name);
        for (suffix, alt, exclusive) in [("", "main building", true), ("2", "laboratory", false)] {
            let image = NewImage {
                image_url: format!("https://picsum.photos/seed/{seed}{suffix}/800/600"),
                alt_text: Some(format!("{name} {alt}")),
                exclusive,
            };
            department_images.add_in(&mut tx, id, image).await?;
        }
        contacts::upsert_in(&mut tx, ContactKind::Department, id, &department_contact(id, name)).await?;

        departments.push((id, *name));
        summary.departments += 1;
    }

    let faculty_images = ImageRepo::new(pool, ImageKind::Faculty);
    for person in FACULTY {
        let Some(&(department_id, _)) = departments.iter().find(|(_, n)| *n == person.department) else {
            continue;
        };

        let (faculty_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO faculty (department_id, first_name, last_name, title, bio)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING faculty_id
            "#,
        )
        .bind(department_id)
        .bind(person.first_name)
        .bind(person.last_name)
        .bind(person.title)
        .bind(person.bio)
        .fetch_one(&mut *tx)
        .await?;

        let image = NewImage {
            image_url: format!(
                "https://i.pravatar.cc/300?u={}{}",
                person.first_name, person.last_name
            ),
            alt_text: Some(format!("{} {} profile picture", person.first_name, person.last_name)),
            exclusive: true,
        };
        faculty_images.add_in(&mut tx, faculty_id, image).await?;

        let contact = faculty_contact(faculty_id, department_id, person);
        contacts::upsert_in(&mut tx, ContactKind::Faculty, faculty_id, &contact).await?;

        if memberships::link_in(&mut tx, faculty_id, department_id).await? {
            summary.memberships += 1;
        }

        let extra = rand::thread_rng().gen_bool(EXTRA_MEMBERSHIP_CHANCE);
        if extra {
            if let Some(&(other, _)) = departments.iter().find(|(id, _)| *id != department_id) {
                if memberships::link_in(&mut tx, faculty_id, other).await? {
                    summary.memberships += 1;
                }
            }
        }

        summary.faculty += 1;
    }

    tx.commit().await?;
    tracing::info!(
        users = summary.users,
        departments = summary.departments,
        faculty = summary.faculty,
        memberships = summary.memberships,
        "database seeded"
    );

    Ok(summary)
}
