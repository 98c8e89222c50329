//! Configure command for creating or resetting a start list.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use startlist_core::{ScheduleSettings, service};
use startlist_db::Database;

use super::util::{format_instant, race_ids};
use crate::Config;
use crate::cli::RaceArgs;

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub race: RaceArgs,

    /// First start, RFC 3339 (e.g., 2025-05-17T10:00:00Z).
    #[arg(long)]
    pub start: String,

    /// Seconds between waves [default: from config].
    #[arg(long, allow_hyphen_values = true)]
    pub interval: Option<i64>,

    /// Number of physical start lanes [default: from config].
    #[arg(long, allow_hyphen_values = true)]
    pub lanes: Option<i64>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &ConfigureArgs,
    config: &Config,
) -> Result<()> {
    let (event_id, race_id) = race_ids(&args.race)?;
    let settings = ScheduleSettings::parse(
        &args.start,
        args.interval.unwrap_or(config.default_interval_seconds),
        args.lanes.unwrap_or(config.default_lane_count),
    )?;

    let draft = service::configure(db, &event_id, &race_id, settings)?;

    writeln!(
        writer,
        "Configured {}/{} [{}]",
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
    Ok(())
}
