//! Contact payloads shared by departments and faculty

use serde::{Deserialize, Serialize};

/// Contact fields as sent by clients and returned in records.
///
/// `website_url` only applies to faculty; it is ignored for departments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub office_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl ContactInfo {
    /// True when no field carries a non-empty value.
    ///
    /// Creation skips blank contacts; PATCH writes them as given.
    pub fn is_blank(&self) -> bool {
        [
            &self.email,
            &self.phone,
            &self.office_location,
            &self.website_url,
        ]
        .iter()
        .all(|v| v.as_deref().map_or(true, str::is_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(ContactInfo::default().is_blank());

        let empty_strings = ContactInfo {
            email: Some(String::new()),
            phone: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_strings.is_blank());

        let with_phone = ContactInfo {
            phone: Some("(850) 555-0100".into()),
            ..Default::default()
        };
        assert!(!with_phone.is_blank());
    }

    #[test]
    fn missing_keys_deserialize_as_none() {
        let info: ContactInfo = serde_json::from_str(r#"{"email": "cs@fsu.edu"}"#).unwrap();
        assert_eq!(info.email.as_deref(), Some("cs@fsu.edu"));
        assert_eq!(info.phone, None);
        assert_eq!(info.website_url, None);
    }
}
