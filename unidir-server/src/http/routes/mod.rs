//! Route handlers organized by resource

pub mod admin;
pub mod departments;
pub mod faculty;
pub mod health;
pub mod images;
pub mod memberships;
pub mod users;
