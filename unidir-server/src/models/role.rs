//! Account roles

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Account role stored in `users.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Visitor,
    Administrator,
}

impl Role {
    /// Parse a role from its stored name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "visitor" => Some(Self::Visitor),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Administrator => "administrator",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ValidationError::InvalidVariant {
            field: "role",
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_stored_names() {
        for role in [Role::Visitor, Role::Administrator] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn rejects_unknown() {
        let err = Role::try_from("root".to_string()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "role", .. }));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Role::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");
    }
}
