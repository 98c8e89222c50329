//! Finalize command for publishing a start list.

use std::io::Write;

use anyhow::Result;

use startlist_core::service;
use startlist_db::Database;

use super::util::race_ids;
use crate::cli::RaceArgs;

pub fn run<W: Write>(writer: &mut W, db: &Database, race: &RaceArgs) -> Result<()> {
    let (event_id, race_id) = race_ids(race)?;
    let draft = service::finalize(db, &event_id, &race_id)?;

    writeln!(
        writer,
        "Published {}/{} with {} starters [{}]",
        draft.event_id(),
        draft.race_id(),
        draft.participant_slots().len(),
        draft.status()
    )?;
    Ok(())
}
