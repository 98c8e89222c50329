//! Read models supplied by the entry reception context.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{EntryClassId, ParticipantEntryId};

/// An entry class open for a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryClass {
    pub class_id: EntryClassId,
    pub name: String,
}

impl EntryClass {
    pub fn new(class_id: &str, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            class_id: EntryClassId::new(class_id)?,
            name: name.to_string(),
        })
    }
}

/// A participant registered for a race, as handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantEntry {
    entry_id: ParticipantEntryId,
    entry_class_id: EntryClassId,
    participant_name: String,
    /// When the entry was submitted. Earlier submissions start earlier.
    submitted_at: DateTime<Utc>,
}

impl ParticipantEntry {
    pub fn new(
        entry_id: &str,
        entry_class_id: &str,
        participant_name: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if participant_name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "participant name",
            });
        }
        Ok(Self {
            entry_id: ParticipantEntryId::new(entry_id)?,
            entry_class_id: EntryClassId::new(entry_class_id)?,
            participant_name: participant_name.to_string(),
            submitted_at,
        })
    }

    pub const fn entry_id(&self) -> &ParticipantEntryId {
        &self.entry_id
    }

    pub const fn entry_class_id(&self) -> &EntryClassId {
        &self.entry_class_id
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_entry_requires_name() {
        let err = ParticipantEntry::new("e1", "M21E", " ", Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "participant name"
            }
        );
    }

    #[test]
    fn participant_entry_requires_class() {
        let err = ParticipantEntry::new("e1", "", "Ada", Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "entry class ID"
            }
        );
    }
}
