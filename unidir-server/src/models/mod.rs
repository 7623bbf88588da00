//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod contact;
pub mod email;
pub mod name;
pub mod patch;
pub mod role;
pub mod validation;

pub use contact::ContactInfo;
pub use email::Email;
pub use name::{DepartmentName, PersonName};
pub use role::Role;
pub use validation::ValidationError;
