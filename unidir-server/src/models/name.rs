//! Name validation for departments and people

use super::ValidationError;

/// Maximum length for any stored name
const MAX_NAME_LEN: usize = 255;

fn validated(field: &'static str, s: &str) -> Result<String, ValidationError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(trimmed.to_owned())
}

/// Validated department name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentName(String);

impl DepartmentName {
    /// Create a department name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use unidir_server::models::DepartmentName;
    ///
    /// assert_eq!(DepartmentName::new("  Physics ").unwrap().as_str(), "Physics");
    /// assert!(DepartmentName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validated("name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for DepartmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated first or last name of a faculty member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a first name.
    pub fn first(s: &str) -> Result<Self, ValidationError> {
        validated("first_name", s).map(Self)
    }

    /// Validate a last name.
    pub fn last(s: &str) -> Result<Self, ValidationError> {
        validated("last_name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
