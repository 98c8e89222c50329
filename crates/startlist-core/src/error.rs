//! Error kinds raised by the scheduling domain.

use thiserror::Error;

/// Malformed or constraint-violating input.
///
/// Messages are meant to be shown to the end user unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The start instant could not be parsed.
    #[error("invalid start instant: {value}")]
    InvalidInstant { value: String },

    /// The interval between waves was zero or negative.
    #[error("interval must be a positive number of seconds, got {value}")]
    NonPositiveInterval { value: i64 },

    /// The number of lanes was zero or negative.
    #[error("lane count must be a positive integer, got {value}")]
    NonPositiveLaneCount { value: i64 },

    /// The number of lanes does not fit a lane number.
    #[error("lane count {value} is too large")]
    LaneCountTooLarge { value: i64 },

    /// A lane number was zero or negative.
    #[error("lane number must be a positive integer, got {value}")]
    NonPositiveLane { value: i64 },

    /// A lane number exceeded the configured lane count.
    #[error("lane {lane} exceeds the configured lane count of {lane_count}")]
    LaneOutOfRange { lane: i64, lane_count: u32 },

    /// A sequence number was negative.
    #[error("sequence must be zero or positive, got {value}")]
    NegativeSequence { value: i64 },

    /// The computed start instant cannot be represented.
    #[error("start instant for sequence {sequence} is out of range")]
    StartInstantOutOfRange { sequence: i64 },

    /// No lane assignments were supplied.
    #[error("at least one lane assignment is required")]
    NoLaneAssignments,

    /// An entry class is not open for the race.
    #[error("entry class {class_id} is not available for this race")]
    UnknownEntryClass { class_id: String },

    /// Two assignments share a lane number.
    #[error("duplicate lane: lane {lane} is assigned more than once")]
    DuplicateLane { lane: u32 },

    /// Two assignments share an entry class.
    #[error("duplicate class: entry class {class_id} is assigned more than once")]
    DuplicateClass { class_id: String },

    /// No participants were supplied for scheduling.
    #[error("at least one participant is required for scheduling")]
    NoCandidates,

    /// A participant belongs to a class without a lane.
    #[error("unassigned class: entry class {class_id} of participant {entry_id} has no lane")]
    UnassignedClass { entry_id: String, class_id: String },

    /// The same participant entry was supplied twice.
    #[error("duplicate participant: entry {entry_id} appears more than once")]
    DuplicateParticipant { entry_id: String },

    /// A stored slot disagrees with the lane assignments it was restored with.
    #[error("slot for entry {entry_id} does not match lane assignment of class {class_id}")]
    SlotLaneMismatch { entry_id: String, class_id: String },

    /// Two stored slots share a sequence number.
    #[error("duplicate sequence: sequence {sequence} is used more than once")]
    DuplicateSequence { sequence: u64 },

    /// A stored start instant disagrees with the settings.
    #[error("stored start instant of sequence {sequence} does not match the settings")]
    StartInstantMismatch { sequence: u64 },

    /// Invalid status label.
    #[error("invalid start list status: {value}")]
    InvalidStatus { value: String },
}

/// An operation attempted in the wrong lifecycle state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("start list is already published")]
    AlreadyPublished,

    #[error("lanes must be assigned before scheduling participants")]
    LanesNotAssigned,

    #[error("scheduling produced no slots")]
    NoSlotsProduced,

    #[error("nothing to publish: no participants are scheduled")]
    NothingToPublish,

    /// Participant slots were present without any lane assignment.
    #[error("participant slots require lane assignments")]
    SlotsWithoutLanes,
}

/// Failure of a start list transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartListError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),
}
