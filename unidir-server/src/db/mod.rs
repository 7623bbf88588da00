//! Database layer - connection pool, schema, and repositories
//!
//! # Design Principles
//!
//! - One pool per process, injected through `AppState`
//! - Driver errors are classified once, in [`DbError::classify`]
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations, including partial updates
//!   with dependent image and contact writes

pub mod error;
pub mod flag;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;
pub mod update;

pub use error::DbError;
pub use flag::{ExclusiveFlag, DEPARTMENT_PRIMARY, FACULTY_PROFILE};
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
pub use update::{BuiltUpdate, PartialUpdate, SqlValue};
