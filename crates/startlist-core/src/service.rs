//! Start list use cases.
//!
//! Each use case loads the current draft, applies exactly one transition and
//! writes the result back. Detecting concurrent writers for the same race is
//! left to the repository.

use std::collections::HashSet;

use thiserror::Error;

use crate::draft::{LaneRequest, StartListDraft};
use crate::error::{StartListError, ValidationError};
use crate::ports::{EntryClassLookup, ParticipantEntryLookup, PortError, StartListRepository};
use crate::settings::ScheduleSettings;
use crate::types::{EntryClassId, EventId, RaceId};

/// Failure of a use case.
#[derive(Debug, Error)]
pub enum UseCaseError {
    /// No start list exists for the race.
    #[error("no start list for event {event_id}, race {race_id}")]
    NotFound { event_id: EventId, race_id: RaceId },

    #[error(transparent)]
    StartList(#[from] StartListError),

    /// An adapter failed.
    #[error("storage error: {0}")]
    Port(#[source] PortError),
}

impl From<ValidationError> for UseCaseError {
    fn from(err: ValidationError) -> Self {
        Self::StartList(err.into())
    }
}

fn load<R>(repo: &R, event_id: &EventId, race_id: &RaceId) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
{
    repo.find_by_event_and_race(event_id, race_id)
        .map_err(UseCaseError::Port)?
        .ok_or_else(|| UseCaseError::NotFound {
            event_id: event_id.clone(),
            race_id: race_id.clone(),
        })
}

fn store<R>(repo: &R, draft: StartListDraft) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
{
    repo.save(&draft).map_err(UseCaseError::Port)?;
    Ok(draft)
}

/// Creates the race's draft, or resets an existing one to new settings.
pub fn configure<R>(
    repo: &R,
    event_id: &EventId,
    race_id: &RaceId,
    settings: ScheduleSettings,
) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
{
    let draft = match repo
        .find_by_event_and_race(event_id, race_id)
        .map_err(UseCaseError::Port)?
    {
        Some(existing) => existing.reconfigure(settings)?,
        None => StartListDraft::initialize(event_id.as_str(), race_id.as_str(), settings)?,
    };
    tracing::info!(
        %event_id,
        %race_id,
        start = %settings.start_instant(),
        interval_seconds = settings.interval_seconds(),
        lane_count = settings.lane_count(),
        "configured start list"
    );
    store(repo, draft)
}

/// Assigns the race's entry classes to lanes.
pub fn assign_lanes<R, C>(
    repo: &R,
    classes: &C,
    event_id: &EventId,
    race_id: &RaceId,
    requests: &[LaneRequest],
) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
    C: EntryClassLookup + ?Sized,
{
    let draft = load(repo, event_id, race_id)?;
    let available: HashSet<EntryClassId> = classes
        .entry_classes(race_id)
        .map_err(UseCaseError::Port)?
        .into_iter()
        .map(|class| class.class_id)
        .collect();

    let draft = draft.assign_lanes(requests, &available)?;
    tracing::info!(
        %event_id,
        %race_id,
        lanes = draft.lane_assignments().len(),
        "assigned lanes"
    );
    store(repo, draft)
}

/// Schedules every participant entry of the race.
pub fn schedule_participants<R, P>(
    repo: &R,
    entries: &P,
    event_id: &EventId,
    race_id: &RaceId,
) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
    P: ParticipantEntryLookup + ?Sized,
{
    let draft = load(repo, event_id, race_id)?;
    let candidates = entries
        .participant_entries(event_id, race_id)
        .map_err(UseCaseError::Port)?;

    let draft = draft.schedule_participants(&candidates)?;
    tracing::info!(
        %event_id,
        %race_id,
        slots = draft.participant_slots().len(),
        "scheduled participants"
    );
    store(repo, draft)
}

/// Publishes the race's start list.
pub fn finalize<R>(
    repo: &R,
    event_id: &EventId,
    race_id: &RaceId,
) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
{
    let draft = load(repo, event_id, race_id)?.finalize()?;
    tracing::info!(%event_id, %race_id, "published start list");
    store(repo, draft)
}

/// Loads the race's start list.
pub fn start_list<R>(
    repo: &R,
    event_id: &EventId,
    race_id: &RaceId,
) -> Result<StartListDraft, UseCaseError>
where
    R: StartListRepository + ?Sized,
{
    load(repo, event_id, race_id)
}

/// Deletes the race's start list in any state.
pub fn discard<R>(repo: &R, event_id: &EventId, race_id: &RaceId) -> Result<(), UseCaseError>
where
    R: StartListRepository + ?Sized,
{
    if repo.delete(event_id, race_id).map_err(UseCaseError::Port)? {
        tracing::info!(%event_id, %race_id, "discarded start list");
        Ok(())
    } else {
        Err(UseCaseError::NotFound {
            event_id: event_id.clone(),
            race_id: race_id.clone(),
        })
    }
}
