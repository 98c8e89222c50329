//! Identifier newtypes and the start list status label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated event identifier.
    EventId, "event ID"
);

define_string_id!(
    /// A validated race identifier.
    ///
    /// A race belongs to exactly one event; at most one start list exists per
    /// (event, race) pair.
    RaceId, "race ID"
);

define_string_id!(
    /// A validated entry class identifier (e.g. "M21E", "W35").
    EntryClassId, "entry class ID"
);

define_string_id!(
    /// A validated participant entry identifier.
    ParticipantEntryId, "participant entry ID"
);

/// Lifecycle status of a start list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StartListStatus {
    /// Still editable.
    Draft,
    /// Finalized; no further changes are accepted.
    Published,
}

impl StartListStatus {
    /// Derives the status from the finalized flag.
    pub const fn from_finalized(finalized: bool) -> Self {
        if finalized { Self::Published } else { Self::Draft }
    }

    /// String label used in storage and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for StartListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StartListStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            _ => Err(ValidationError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_empty_and_blank() {
        assert_eq!(
            EventId::new(""),
            Err(ValidationError::Empty { field: "event ID" })
        );
        assert_eq!(
            RaceId::new("   "),
            Err(ValidationError::Empty { field: "race ID" })
        );
        assert!(EntryClassId::new("M21E").is_ok());
    }

    #[test]
    fn ids_deserialize_with_validation() {
        let parsed: ParticipantEntryId = serde_json::from_str(r#""entry-1""#).unwrap();
        assert_eq!(parsed.as_str(), "entry-1");

        let result: Result<ParticipantEntryId, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }

    #[test]
    fn status_labels() {
        assert_eq!(StartListStatus::from_finalized(false).to_string(), "DRAFT");
        assert_eq!(
            StartListStatus::from_finalized(true).to_string(),
            "PUBLISHED"
        );
        assert_eq!(
            "PUBLISHED".parse::<StartListStatus>(),
            Ok(StartListStatus::Published)
        );
        assert!("draft".parse::<StartListStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&StartListStatus::Draft).unwrap();
        assert_eq!(json, r#""DRAFT""#);
    }
}
