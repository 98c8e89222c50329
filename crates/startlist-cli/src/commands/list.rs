//! List command for the start list overview.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use startlist_db::{Database, StartListSummary};

/// Start list overview row for display.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub event_id: String,
    pub race_id: String,
    pub lane_count: i64,
    pub lanes_assigned: i64,
    pub slots: i64,
    pub status: String,
    pub updated_at: String,
}

impl From<StartListSummary> for ListEntry {
    fn from(summary: StartListSummary) -> Self {
        Self {
            event_id: summary.event_id,
            race_id: summary.race_id,
            lane_count: summary.lane_count,
            lanes_assigned: summary.lanes_assigned,
            slots: summary.slots,
            status: summary.status,
            updated_at: summary.updated_at,
        }
    }
}

pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let entries: Vec<ListEntry> = db
        .list_start_lists()?
        .into_iter()
        .map(ListEntry::from)
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *writer, &entries)?;
        writeln!(writer)?;
        return Ok(());
    }

    format_entries(writer, &entries)?;
    Ok(())
}

fn format_entries<W: Write>(writer: &mut W, entries: &[ListEntry]) -> std::io::Result<()> {
    if entries.is_empty() {
        writeln!(writer, "No start lists yet.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'startlist configure --event <id> --race <id> --start <time>' to create one."
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<16}  {:<16}  {:>5}  {:>5}  {:<9}  {}",
        "Event", "Race", "Lanes", "Slots", "Status", "Updated"
    )?;
    for entry in entries {
        let lanes = format!("{}/{}", entry.lanes_assigned, entry.lane_count);
        writeln!(
            writer,
            "{:<16}  {:<16}  {:>5}  {:>5}  {:<9}  {}",
            entry.event_id, entry.race_id, lanes, entry.slots, entry.status, entry.updated_at
        )?;
    }
    Ok(())
}
