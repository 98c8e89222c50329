//! Schedule command for placing every registered participant.

use std::io::Write;

use anyhow::Result;

use startlist_core::service;
use startlist_db::Database;

use super::show::render_start_list;
use super::util::race_ids;
use crate::cli::RaceArgs;

pub fn run<W: Write>(writer: &mut W, db: &Database, race: &RaceArgs) -> Result<()> {
    let (event_id, race_id) = race_ids(race)?;
    let draft = service::schedule_participants(db, db, &event_id, &race_id)?;
    let classes = db.list_entry_classes(race_id.as_str())?;

    writeln!(
        writer,
        "Scheduled {} participants",
        draft.participant_slots().len()
    )?;
    writeln!(writer)?;
    render_start_list(writer, &draft, &classes)?;
    Ok(())
}
