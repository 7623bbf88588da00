//! Account email validation
//!
//! Emails are normalized to lowercase before storage and lookup.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for an email address (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex")
});

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    ///
    /// # Example
    /// ```
    /// use unidir_server::models::Email;
    ///
    /// assert_eq!(Email::new(" Admin@FSU.edu ").unwrap().as_str(), "admin@fsu.edu");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if normalized.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain.tld",
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases() {
        let email = Email::new("Sarah.Johnson@FSU.EDU").unwrap();
        assert_eq!(email.as_str(), "sarah.johnson@fsu.edu");
    }

    #[test]
    fn rejects_missing_domain() {
        let err = Email::new("sarah@").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_spaces() {
        let err = Email::new("sarah johnson@fsu.edu").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = Email::new("   ").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "email" });
    }
}
