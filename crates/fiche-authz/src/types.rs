//! Strongly typed identifiers for records and reference data.
//!
//! # Purpose
//! Wraps string identifiers so record, status, category and operator ids can
//! not be mixed up at call sites.
//!
//! # Key invariants
//! - Values are trimmed on construction; `" 12 "` and `"12"` are the same id.
//! - JSON strings and JSON integers both deserialize; integers are kept as
//!   their decimal rendering.
//! - A blank id is never produced by [`optional_id`]; blank inputs become `None`.
//!
//! # Examples
//! ```rust
//! use fiche_authz::StatusId;
//!
//! let status = StatusId::new(" s1 ");
//! assert_eq!(status.as_str(), "s1");
//! assert_eq!(status, StatusId::from("s1"));
//! ```
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(value) => value,
            RawId::Signed(value) => value.to_string(),
            RawId::Unsigned(value) => value.to_string(),
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.len() == value.len() {
                    Self(value)
                } else {
                    Self(trimmed.to_string())
                }
            }

            /// Build an id from optional raw input, treating blank text as absent.
            pub fn from_optional(value: Option<&str>) -> Option<Self> {
                value
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(Self::new)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self::new(raw.into_string()))
            }
        }
    };
}

id_type!(
    /// Identity of a contact record.
    RecordId
);
id_type!(
    /// Identity of a lifecycle status (reference data).
    StatusId
);
id_type!(
    /// Identity of a note category (reference data).
    CategoryId
);
id_type!(
    /// Identity of a teleoperator or confirmateur assigned to a record.
    OperatorId
);

/// Serde helper for optional id fields: `null`, missing and blank all map to `None`.
pub fn optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .map(RawId::into_string)
        .filter(|value| !value.trim().is_empty())
        .map(T::from))
}

#[cfg(test)]
mod tests {
    use super::{CategoryId, OperatorId, RecordId, StatusId, optional_id};
    use serde::Deserialize;

    #[test]
    fn constructors_trim_and_display() {
        let record = RecordId::new("r-1");
        let status = StatusId::new("  s1\t");
        let category = CategoryId::from("7 ");
        let operator = OperatorId::from(String::from("op"));

        assert_eq!(record.as_str(), "r-1");
        assert_eq!(status.to_string(), "s1");
        assert_eq!(category.as_str(), "7");
        assert_eq!(operator.as_str(), "op");
    }

    #[test]
    fn from_optional_drops_blank() {
        assert_eq!(StatusId::from_optional(None), None);
        assert_eq!(StatusId::from_optional(Some("   ")), None);
        assert_eq!(StatusId::from_optional(Some(" s2 ")), Some(StatusId::new("s2")));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_number: StatusId = serde_json::from_str("12").expect("number id");
        let from_text: StatusId = serde_json::from_str("\" 12 \"").expect("text id");
        assert_eq!(from_number, from_text);
    }

    #[test]
    fn optional_id_maps_blank_to_none() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "optional_id")]
            id: Option<OperatorId>,
        }

        let blank: Holder = serde_json::from_str(r#"{"id": "  "}"#).expect("blank");
        let null: Holder = serde_json::from_str(r#"{"id": null}"#).expect("null");
        let missing: Holder = serde_json::from_str("{}").expect("missing");
        let set: Holder = serde_json::from_str(r#"{"id": 42}"#).expect("set");

        assert!(blank.id.is_none());
        assert!(null.id.is_none());
        assert!(missing.id.is_none());
        assert_eq!(set.id, Some(OperatorId::new("42")));
    }
}
