//! Assign command for mapping entry classes to lanes.

use std::io::Write;

use anyhow::Result;

use startlist_core::{LaneRequest, service};
use startlist_db::Database;

use super::util::{parse_lane_request, race_ids};
use crate::cli::RaceArgs;

pub fn run<W: Write>(writer: &mut W, db: &Database, race: &RaceArgs, lanes: &[String]) -> Result<()> {
    let (event_id, race_id) = race_ids(race)?;
    let requests = lanes
        .iter()
        .map(|value| parse_lane_request(value))
        .collect::<Result<Vec<LaneRequest>>>()?;

    let draft = service::assign_lanes(db, db, &event_id, &race_id, &requests)?;

    writeln!(
        writer,
        "Assigned {} lanes for {}/{}",
        draft.lane_assignments().len(),
        draft.event_id(),
        draft.race_id()
    )?;
    for assignment in draft.lane_assignments() {
        writeln!(
            writer,
            "  lane {:>2}: {}",
            assignment.lane_number(),
            assignment.entry_class_id()
        )?;
    }
    Ok(())
}
