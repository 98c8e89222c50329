//! Show command for rendering one start list.

use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

use startlist_core::{EntryClass, EntryClassId, StartListDraft, service};
use startlist_db::Database;

use super::util::{format_instant, race_ids};
use crate::cli::RaceArgs;

/// JSON document for `startlist show --json`.
#[derive(Debug, Serialize)]
struct StartListView<'a> {
    #[serde(flatten)]
    start_list: &'a StartListDraft,
    classes: &'a [EntryClass],
}

pub fn run<W: Write>(writer: &mut W, db: &Database, race: &RaceArgs, json: bool) -> Result<()> {
    let (event_id, race_id) = race_ids(race)?;
    let draft = service::start_list(db, &event_id, &race_id)?;
    let classes = db.list_entry_classes(race_id.as_str())?;

    if json {
        let view = StartListView {
            start_list: &draft,
            classes: &classes,
        };
        serde_json::to_writer_pretty(&mut *writer, &view)?;
        writeln!(writer)?;
    } else {
        render_start_list(writer, &draft, &classes)?;
    }
    Ok(())
}

/// Writes the human-readable start list.
pub fn render_start_list<W: Write>(
    writer: &mut W,
    draft: &StartListDraft,
    classes: &[EntryClass],
) -> io::Result<()> {
    let settings = draft.settings();
    let names: HashMap<&EntryClassId, &str> = classes
        .iter()
        .map(|class| (&class.class_id, class.name.as_str()))
        .collect();

    writeln!(
        writer,
        "START LIST {} / {} [{}]",
        draft.event_id(),
        draft.race_id(),
        draft.status()
    )?;
    writeln!(
        writer,
        "First start: {}  Interval: {}s  Lanes: {}",
        format_instant(settings.start_instant()),
        settings.interval_seconds(),
        settings.lane_count()
    )?;
    writeln!(writer)?;

    if draft.lane_assignments().is_empty() {
        writeln!(writer, "No lanes assigned.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'startlist assign --lane 1=<class>' to reserve lanes for classes."
        )?;
        return Ok(());
    }

    writeln!(writer, "LANES")?;
    writeln!(writer, "{:>4}  {:<8}  {}", "Lane", "Class", "Name")?;
    for assignment in draft.lane_assignments() {
        let name = names
            .get(assignment.entry_class_id())
            .copied()
            .unwrap_or("(unknown)");
        writeln!(
            writer,
            "{:>4}  {:<8}  {}",
            assignment.lane_number(),
            assignment.entry_class_id().as_str(),
            name
        )?;
    }
    writeln!(writer)?;

    if draft.participant_slots().is_empty() {
        writeln!(writer, "No participants scheduled.")?;
        return Ok(());
    }

    writeln!(writer, "START ORDER")?;
    writeln!(
        writer,
        "{:>4}  {:>4}  {:<20}  {:>4}  {:<8}  {:<10}  {}",
        "Seq", "Wave", "Start", "Lane", "Class", "Entry", "Name"
    )?;
    for slot in draft.participant_slots() {
        writeln!(
            writer,
            "{:>4}  {:>4}  {:<20}  {:>4}  {:<8}  {:<10}  {}",
            slot.sequence(),
            slot.wave(settings),
            format_instant(slot.start_instant()),
            slot.lane_number(),
            slot.entry_class_id().as_str(),
            slot.participant_entry_id().as_str(),
            slot.participant_name()
        )?;
    }
    Ok(())
}
