//! Scheduled placement of one participant.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entry::ParticipantEntry;
use crate::error::ValidationError;
use crate::lane::validate_lane;
use crate::settings::ScheduleSettings;
use crate::types::{EntryClassId, ParticipantEntryId};

/// A participant's lane, running order and start instant.
///
/// The start instant is always derived from the settings the slot was
/// scheduled with; it cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSlot {
    participant_entry_id: ParticipantEntryId,
    participant_name: String,
    entry_class_id: EntryClassId,
    lane_number: u32,
    sequence: u64,
    start_instant: DateTime<Utc>,
}

impl ParticipantSlot {
    /// Schedules a participant at `sequence` on `lane_number`.
    pub fn schedule(
        participant_entry_id: &str,
        participant_name: &str,
        entry_class_id: &str,
        lane_number: i64,
        sequence: i64,
        settings: &ScheduleSettings,
    ) -> Result<Self, ValidationError> {
        let participant_entry_id = ParticipantEntryId::new(participant_entry_id)?;
        if participant_name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "participant name",
            });
        }
        let entry_class_id = EntryClassId::new(entry_class_id)?;
        let lane_number = validate_lane(lane_number, settings)?;
        let start_instant = settings.calculate_start_instant(sequence)?;
        let sequence = u64::try_from(sequence)
            .map_err(|_| ValidationError::NegativeSequence { value: sequence })?;

        Ok(Self {
            participant_entry_id,
            participant_name: participant_name.to_string(),
            entry_class_id,
            lane_number,
            sequence,
            start_instant,
        })
    }

    /// Places an already validated entry; used by the scheduling run.
    pub(crate) fn place(
        entry: &ParticipantEntry,
        lane_number: u32,
        sequence: u64,
        settings: &ScheduleSettings,
    ) -> Result<Self, ValidationError> {
        let raw_sequence = i64::try_from(sequence).map_err(|_| {
            ValidationError::StartInstantOutOfRange {
                sequence: i64::MAX,
            }
        })?;
        let start_instant = settings.calculate_start_instant(raw_sequence)?;

        Ok(Self {
            participant_entry_id: entry.entry_id().clone(),
            participant_name: entry.participant_name().to_string(),
            entry_class_id: entry.entry_class_id().clone(),
            lane_number,
            sequence,
            start_instant,
        })
    }

    pub const fn participant_entry_id(&self) -> &ParticipantEntryId {
        &self.participant_entry_id
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub const fn entry_class_id(&self) -> &EntryClassId {
        &self.entry_class_id
    }

    pub const fn lane_number(&self) -> u32 {
        self.lane_number
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub const fn start_instant(&self) -> DateTime<Utc> {
        self.start_instant
    }

    /// Wave index of this slot for the given lane count.
    pub fn wave(&self, settings: &ScheduleSettings) -> u64 {
        self.sequence / u64::from(settings.lane_count())
    }
}
