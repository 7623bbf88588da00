//! Field presence for sparse PATCH bodies
//!
//! A PATCH field is modelled as `Option<Option<T>>`:
//! - `None`: the key was absent, leave the column alone
//! - `Some(None)`: the key was an explicit `null`
//! - `Some(Some(v))`: the key carried a value

use serde::{Deserialize, Deserializer};

use super::ValidationError;

/// Deserializer for `Option<Option<T>>` fields that keeps `null` distinct from absent.
///
/// Pair with `#[serde(default)]` so absent keys stay `None`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Collapse a sparse field for a NOT NULL column: explicit `null` is rejected.
pub fn non_null<T>(field: &'static str, value: Option<Option<T>>) -> Result<Option<T>, ValidationError> {
    match value {
        None => Ok(None),
        Some(None) => Err(ValidationError::NullNotAllowed { field }),
        Some(Some(v)) => Ok(Some(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "present")]
        title: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.title, None);

        let null: Body = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(null.title, Some(None));

        let empty: Body = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(empty.title, Some(Some(String::new())));
    }

    #[test]
    fn non_null_rejects_explicit_null() {
        assert_eq!(non_null::<String>("first_name", None).unwrap(), None);
        assert_eq!(
            non_null("first_name", Some(Some("Ann".to_string()))).unwrap(),
            Some("Ann".to_string())
        );

        let err = non_null::<String>("first_name", Some(None)).unwrap_err();
        assert_eq!(err, ValidationError::NullNotAllowed { field: "first_name" });
    }
}
