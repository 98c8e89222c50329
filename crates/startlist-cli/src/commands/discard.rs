//! Discard command for deleting a start list.

use std::io::Write;

use anyhow::Result;

use startlist_core::service;
use startlist_db::Database;

use super::util::race_ids;
use crate::cli::RaceArgs;

pub fn run<W: Write>(writer: &mut W, db: &Database, race: &RaceArgs) -> Result<()> {
    let (event_id, race_id) = race_ids(race)?;
    service::discard(db, &event_id, &race_id)?;
    writeln!(writer, "Discarded start list {event_id}/{race_id}")?;
    Ok(())
}
