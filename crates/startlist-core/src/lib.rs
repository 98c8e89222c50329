//! Core domain logic for race start lists.
//!
//! This crate contains the fundamental types and logic for:
//! - Schedule settings and the start instant rule
//! - Lane assignments and participant slots
//! - The start list draft aggregate and its scheduling algorithm
//! - Ports to entry reception and storage, with in-memory adapters
//! - Use cases that orchestrate one transition each

mod draft;
mod entry;
pub mod error;
mod lane;
pub mod memory;
pub mod ports;
pub mod service;
mod settings;
mod slot;
pub mod types;

pub use draft::{LaneRequest, StartListDraft};
pub use entry::{EntryClass, ParticipantEntry};
pub use error::{StartListError, StateError, ValidationError};
pub use lane::LaneAssignment;
pub use ports::{EntryClassLookup, ParticipantEntryLookup, PortError, StartListRepository};
pub use service::UseCaseError;
pub use settings::ScheduleSettings;
pub use slot::ParticipantSlot;
pub use types::{EntryClassId, EventId, ParticipantEntryId, RaceId, StartListStatus};
