//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Reads join dependents in one statement (no N+1)
//! - One-to-one and junction writes use ON CONFLICT (no check-then-insert)
//! - Multi-step writes run in one transaction; `*_in` helpers take the
//!   caller's connection so they compose

pub mod contacts;
pub mod departments;
pub mod faculty;
pub mod images;
pub mod memberships;
pub mod users;

pub use contacts::ContactKind;
pub use departments::{
    DeletedDepartment, DepartmentChanges, DepartmentRecord, DepartmentRepo, NewDepartment,
    RosterEntry,
};
pub use faculty::{DeletedFaculty, FacultyChanges, FacultyDetail, FacultyRecord, FacultyRepo, NewFaculty};
pub use images::{ImageKind, ImageRepo, ImageRow, NewImage};
pub use memberships::{DepartmentSummary, MembershipRepo};
pub use users::{Credentials, User, UserRepo};
