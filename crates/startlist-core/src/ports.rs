//! Interfaces to the collaborators around the scheduling core.
//!
//! Entry classes and participant entries are owned by the entry reception
//! context and are only read here. Start lists are persisted through
//! [`StartListRepository`], which writes a whole draft as one unit.

use crate::draft::StartListDraft;
use crate::entry::{EntryClass, ParticipantEntry};
use crate::types::{EventId, RaceId};

/// Error raised by an adapter.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Entry classes open for a race.
pub trait EntryClassLookup {
    fn entry_classes(&self, race_id: &RaceId) -> Result<Vec<EntryClass>, PortError>;
}

/// Participant entries registered for a race, in no particular order.
pub trait ParticipantEntryLookup {
    fn participant_entries(
        &self,
        event_id: &EventId,
        race_id: &RaceId,
    ) -> Result<Vec<ParticipantEntry>, PortError>;
}

/// Storage of start list drafts keyed by (event, race).
pub trait StartListRepository {
    /// Inserts or fully replaces the stored draft.
    fn save(&self, draft: &StartListDraft) -> Result<(), PortError>;

    fn find_by_event_and_race(
        &self,
        event_id: &EventId,
        race_id: &RaceId,
    ) -> Result<Option<StartListDraft>, PortError>;

    /// Removes a draft. Returns false when nothing was stored.
    fn delete(&self, event_id: &EventId, race_id: &RaceId) -> Result<bool, PortError>;
}
