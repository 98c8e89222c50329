//! The start list draft aggregate.
//!
//! A draft moves strictly forward through its lifecycle:
//!
//! 1. configured (settings only)
//! 2. lanes assigned (each lane reserved for one entry class)
//! 3. participants scheduled (slots with sequence and start instant)
//! 4. published (immutable)
//!
//! Every transition borrows the current draft and returns a new one, so a
//! caller always holds a consistent snapshot.
//!
//! # Scheduling
//!
//! Participants are queued per lane in submission order. Lanes are visited in
//! ascending order, one participant per lane per pass; each emitted slot takes
//! the next sequence number. Lanes without a class never receive slots, but
//! after every pass that leaves participants waiting the sequence skips one
//! number per such lane, so `floor(sequence / lane_count)` advances with each
//! full sweep of the physical lanes. Lanes whose queue ran dry are skipped
//! without consuming a number.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::entry::ParticipantEntry;
use crate::error::{StartListError, StateError, ValidationError};
use crate::lane::LaneAssignment;
use crate::settings::ScheduleSettings;
use crate::slot::ParticipantSlot;
use crate::types::{EntryClassId, EventId, RaceId, StartListStatus};

/// A requested lane assignment, validated by [`StartListDraft::assign_lanes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneRequest {
    pub lane_number: i64,
    pub entry_class_id: String,
}

impl LaneRequest {
    pub fn new(lane_number: i64, entry_class_id: impl Into<String>) -> Self {
        Self {
            lane_number,
            entry_class_id: entry_class_id.into(),
        }
    }
}

/// Start list of one race, before or after publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartListDraft {
    event_id: EventId,
    race_id: RaceId,
    settings: ScheduleSettings,
    /// Sorted by lane number.
    lane_assignments: Vec<LaneAssignment>,
    /// Sorted by sequence.
    participant_slots: Vec<ParticipantSlot>,
    finalized: bool,
}

impl StartListDraft {
    /// Creates an empty draft for a race.
    pub fn initialize(
        event_id: &str,
        race_id: &str,
        settings: ScheduleSettings,
    ) -> Result<Self, ValidationError> {
        let event_id = EventId::new(event_id)?;
        let race_id = RaceId::new(race_id)?;
        tracing::debug!(%event_id, %race_id, "initialized start list draft");
        Ok(Self {
            event_id,
            race_id,
            settings,
            lane_assignments: Vec::new(),
            participant_slots: Vec::new(),
            finalized: false,
        })
    }

    /// Rebuilds a draft from stored parts, re-checking every invariant.
    pub fn restore(
        event_id: EventId,
        race_id: RaceId,
        settings: ScheduleSettings,
        mut lane_assignments: Vec<LaneAssignment>,
        mut participant_slots: Vec<ParticipantSlot>,
        finalized: bool,
    ) -> Result<Self, StartListError> {
        let mut class_to_lane: HashMap<&EntryClassId, u32> = HashMap::new();
        let mut lanes = HashSet::new();
        for assignment in &lane_assignments {
            let lane = assignment.lane_number();
            if lane > settings.lane_count() {
                return Err(ValidationError::LaneOutOfRange {
                    lane: i64::from(lane),
                    lane_count: settings.lane_count(),
                }
                .into());
            }
            if !lanes.insert(lane) {
                return Err(ValidationError::DuplicateLane { lane }.into());
            }
            if class_to_lane
                .insert(assignment.entry_class_id(), lane)
                .is_some()
            {
                return Err(ValidationError::DuplicateClass {
                    class_id: assignment.entry_class_id().to_string(),
                }
                .into());
            }
        }

        if !participant_slots.is_empty() && lane_assignments.is_empty() {
            return Err(StateError::SlotsWithoutLanes.into());
        }

        let mut sequences = HashSet::new();
        let mut entries = HashSet::new();
        for slot in &participant_slots {
            if class_to_lane.get(slot.entry_class_id()) != Some(&slot.lane_number()) {
                return Err(ValidationError::SlotLaneMismatch {
                    entry_id: slot.participant_entry_id().to_string(),
                    class_id: slot.entry_class_id().to_string(),
                }
                .into());
            }
            if !sequences.insert(slot.sequence()) {
                return Err(ValidationError::DuplicateSequence {
                    sequence: slot.sequence(),
                }
                .into());
            }
            if !entries.insert(slot.participant_entry_id()) {
                return Err(ValidationError::DuplicateParticipant {
                    entry_id: slot.participant_entry_id().to_string(),
                }
                .into());
            }
            let expected = settings
                .calculate_start_instant(i64::try_from(slot.sequence()).unwrap_or(i64::MAX))?;
            if expected != slot.start_instant() {
                return Err(ValidationError::StartInstantMismatch {
                    sequence: slot.sequence(),
                }
                .into());
            }
        }

        lane_assignments.sort_by_key(LaneAssignment::lane_number);
        participant_slots.sort_by_key(ParticipantSlot::sequence);

        Ok(Self {
            event_id,
            race_id,
            settings,
            lane_assignments,
            participant_slots,
            finalized,
        })
    }

    /// Replaces the settings and discards lanes and slots.
    pub fn reconfigure(&self, settings: ScheduleSettings) -> Result<Self, StartListError> {
        self.ensure_editable()?;
        tracing::debug!(
            event_id = %self.event_id,
            race_id = %self.race_id,
            dropped_lanes = self.lane_assignments.len(),
            dropped_slots = self.participant_slots.len(),
            "reconfigured start list draft"
        );
        Ok(Self {
            event_id: self.event_id.clone(),
            race_id: self.race_id.clone(),
            settings,
            lane_assignments: Vec::new(),
            participant_slots: Vec::new(),
            finalized: false,
        })
    }

    /// Assigns entry classes to lanes and discards any scheduled slots.
    ///
    /// `available_class_ids` are the classes currently open for the race.
    pub fn assign_lanes(
        &self,
        requests: &[LaneRequest],
        available_class_ids: &HashSet<EntryClassId>,
    ) -> Result<Self, StartListError> {
        self.ensure_editable()?;
        if requests.is_empty() {
            return Err(ValidationError::NoLaneAssignments.into());
        }

        let mut lanes = HashSet::new();
        let mut classes = HashSet::new();
        let mut lane_assignments = Vec::with_capacity(requests.len());
        for request in requests {
            let assignment = LaneAssignment::assign(
                request.lane_number,
                &request.entry_class_id,
                &self.settings,
            )?;
            if !available_class_ids.contains(assignment.entry_class_id()) {
                return Err(ValidationError::UnknownEntryClass {
                    class_id: assignment.entry_class_id().to_string(),
                }
                .into());
            }
            if !lanes.insert(assignment.lane_number()) {
                return Err(ValidationError::DuplicateLane {
                    lane: assignment.lane_number(),
                }
                .into());
            }
            if !classes.insert(assignment.entry_class_id().clone()) {
                return Err(ValidationError::DuplicateClass {
                    class_id: assignment.entry_class_id().to_string(),
                }
                .into());
            }
            lane_assignments.push(assignment);
        }
        lane_assignments.sort_by_key(LaneAssignment::lane_number);

        tracing::debug!(
            event_id = %self.event_id,
            race_id = %self.race_id,
            lanes = lane_assignments.len(),
            "assigned lanes"
        );
        Ok(Self {
            event_id: self.event_id.clone(),
            race_id: self.race_id.clone(),
            settings: self.settings,
            lane_assignments,
            participant_slots: Vec::new(),
            finalized: false,
        })
    }

    /// Computes lane, sequence and start instant for every candidate.
    ///
    /// The result replaces any previously scheduled slots.
    pub fn schedule_participants(
        &self,
        candidates: &[ParticipantEntry],
    ) -> Result<Self, StartListError> {
        self.ensure_editable()?;
        if self.lane_assignments.is_empty() {
            return Err(StateError::LanesNotAssigned.into());
        }
        if candidates.is_empty() {
            return Err(ValidationError::NoCandidates.into());
        }

        let class_to_lane: HashMap<&EntryClassId, u32> = self
            .lane_assignments
            .iter()
            .map(|assignment| (assignment.entry_class_id(), assignment.lane_number()))
            .collect();

        let mut ordered: Vec<&ParticipantEntry> = candidates.iter().collect();
        ordered.sort_by(|a, b| {
            a.submitted_at()
                .cmp(&b.submitted_at())
                .then_with(|| a.entry_id().cmp(b.entry_id()))
        });

        let mut queues: BTreeMap<u32, VecDeque<&ParticipantEntry>> = self
            .lane_assignments
            .iter()
            .map(|assignment| (assignment.lane_number(), VecDeque::new()))
            .collect();
        let mut seen = HashSet::new();
        for candidate in ordered {
            let Some(&lane) = class_to_lane.get(candidate.entry_class_id()) else {
                return Err(ValidationError::UnassignedClass {
                    entry_id: candidate.entry_id().to_string(),
                    class_id: candidate.entry_class_id().to_string(),
                }
                .into());
            };
            if !seen.insert(candidate.entry_id()) {
                return Err(ValidationError::DuplicateParticipant {
                    entry_id: candidate.entry_id().to_string(),
                }
                .into());
            }
            queues.entry(lane).or_default().push_back(candidate);
        }

        let lane_count = self.settings.lane_count();
        let filled_lanes = u32::try_from(queues.len()).unwrap_or(lane_count);
        let unused_lanes = u64::from(lane_count.saturating_sub(filled_lanes));

        let mut participant_slots = Vec::with_capacity(candidates.len());
        let mut sequence: u64 = 0;
        while queues.values().any(|queue| !queue.is_empty()) {
            for (&lane, queue) in &mut queues {
                if let Some(entry) = queue.pop_front() {
                    participant_slots.push(ParticipantSlot::place(
                        entry,
                        lane,
                        sequence,
                        &self.settings,
                    )?);
                    sequence += 1;
                }
            }
            if queues.values().any(|queue| !queue.is_empty()) {
                sequence += unused_lanes;
            }
        }

        if participant_slots.is_empty() {
            return Err(StateError::NoSlotsProduced.into());
        }

        tracing::debug!(
            event_id = %self.event_id,
            race_id = %self.race_id,
            slots = participant_slots.len(),
            last_sequence = sequence.saturating_sub(1),
            "scheduled participants"
        );
        Ok(Self {
            event_id: self.event_id.clone(),
            race_id: self.race_id.clone(),
            settings: self.settings,
            lane_assignments: self.lane_assignments.clone(),
            participant_slots,
            finalized: false,
        })
    }

    /// Publishes the start list. No transition is accepted afterwards.
    pub fn finalize(&self) -> Result<Self, StartListError> {
        self.ensure_editable()?;
        if self.participant_slots.is_empty() {
            return Err(StateError::NothingToPublish.into());
        }
        tracing::debug!(event_id = %self.event_id, race_id = %self.race_id, "published start list");
        Ok(Self {
            finalized: true,
            ..self.clone()
        })
    }

    fn ensure_editable(&self) -> Result<(), StateError> {
        if self.finalized {
            return Err(StateError::AlreadyPublished);
        }
        Ok(())
    }

    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub const fn race_id(&self) -> &RaceId {
        &self.race_id
    }

    pub const fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Lane assignments in ascending lane order.
    pub fn lane_assignments(&self) -> &[LaneAssignment] {
        &self.lane_assignments
    }

    /// Participant slots in ascending sequence order.
    pub fn participant_slots(&self) -> &[ParticipantSlot] {
        &self.participant_slots
    }

    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub const fn status(&self) -> StartListStatus {
        StartListStatus::from_finalized(self.finalized)
    }
}

impl Serialize for StartListDraft {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("StartListDraft", 7)?;
        state.serialize_field("event_id", &self.event_id)?;
        state.serialize_field("race_id", &self.race_id)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("finalized", &self.finalized)?;
        state.serialize_field("settings", &self.settings)?;
        state.serialize_field("lane_assignments", &self.lane_assignments)?;
        state.serialize_field("participant_slots", &self.participant_slots)?;
        state.end()
    }
}
