//! In-memory adapters for the ports.
//!
//! Useful for embedding and tests. Not shared across threads.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::draft::StartListDraft;
use crate::entry::{EntryClass, ParticipantEntry};
use crate::ports::{EntryClassLookup, ParticipantEntryLookup, PortError, StartListRepository};
use crate::types::{EventId, RaceId};

/// Start lists held in a map keyed by (event, race).
#[derive(Debug, Default)]
pub struct MemoryStartLists {
    drafts: RefCell<BTreeMap<(EventId, RaceId), StartListDraft>>,
}

impl MemoryStartLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.drafts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.borrow().is_empty()
    }
}

impl StartListRepository for MemoryStartLists {
    fn save(&self, draft: &StartListDraft) -> Result<(), PortError> {
        let key = (draft.event_id().clone(), draft.race_id().clone());
        self.drafts.borrow_mut().insert(key, draft.clone());
        Ok(())
    }

    fn find_by_event_and_race(
        &self,
        event_id: &EventId,
        race_id: &RaceId,
    ) -> Result<Option<StartListDraft>, PortError> {
        let key = (event_id.clone(), race_id.clone());
        Ok(self.drafts.borrow().get(&key).cloned())
    }

    fn delete(&self, event_id: &EventId, race_id: &RaceId) -> Result<bool, PortError> {
        let key = (event_id.clone(), race_id.clone());
        Ok(self.drafts.borrow_mut().remove(&key).is_some())
    }
}

/// Entry classes and participant entries for any number of races.
#[derive(Debug, Clone, Default)]
pub struct MemoryEntries {
    classes: BTreeMap<RaceId, Vec<EntryClass>>,
    entries: BTreeMap<(EventId, RaceId), Vec<ParticipantEntry>>,
}

impl MemoryEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an entry class for a race.
    #[must_use]
    pub fn with_class(mut self, race_id: &RaceId, class: EntryClass) -> Self {
        self.classes.entry(race_id.clone()).or_default().push(class);
        self
    }

    /// Registers a participant entry for a race.
    #[must_use]
    pub fn with_entry(mut self, event_id: &EventId, race_id: &RaceId, entry: ParticipantEntry) -> Self {
        self.entries
            .entry((event_id.clone(), race_id.clone()))
            .or_default()
            .push(entry);
        self
    }
}

impl EntryClassLookup for MemoryEntries {
    fn entry_classes(&self, race_id: &RaceId) -> Result<Vec<EntryClass>, PortError> {
        Ok(self.classes.get(race_id).cloned().unwrap_or_default())
    }
}

impl ParticipantEntryLookup for MemoryEntries {
    fn participant_entries(
        &self,
        event_id: &EventId,
        race_id: &RaceId,
    ) -> Result<Vec<ParticipantEntry>, PortError> {
        let key = (event_id.clone(), race_id.clone());
        Ok(self.entries.get(&key).cloned().unwrap_or_default())
    }
}
