//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::configure::ConfigureArgs;

/// Start list scheduling for orienteering races.
///
/// Assigns entry classes to start lanes, orders participants by submission
/// time and computes every start time.
#[derive(Debug, Parser)]
#[command(name = "startlist", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Identifies the race a command applies to.
#[derive(Debug, Clone, Args)]
pub struct RaceArgs {
    /// Event identifier.
    #[arg(long)]
    pub event: String,

    /// Race identifier within the event.
    #[arg(long)]
    pub race: String,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a start list, or reset an existing draft to new settings.
    Configure(ConfigureArgs),

    /// Assign entry classes to lanes. Clears scheduled participants.
    Assign {
        #[command(flatten)]
        race: RaceArgs,

        /// Lane assignment as LANE=CLASS; repeat for every lane.
        #[arg(long = "lane", value_name = "LANE=CLASS", required = true)]
        lanes: Vec<String>,
    },

    /// Schedule every registered participant.
    Schedule {
        #[command(flatten)]
        race: RaceArgs,
    },

    /// Publish the start list. It cannot be changed afterwards.
    Finalize {
        #[command(flatten)]
        race: RaceArgs,
    },

    /// Show one start list.
    Show {
        #[command(flatten)]
        race: RaceArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List all start lists.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a start list, published or not.
    Discard {
        #[command(flatten)]
        race: RaceArgs,
    },

    /// Import entry reception data as JSON Lines from stdin.
    Import {
        #[command(subcommand)]
        kind: ImportKind,
    },
}

/// Data that can be imported.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ImportKind {
    /// Entry classes: {"race_id", "id", "name"} per line.
    Classes,

    /// Participant entries: {"id", "event_id", "race_id", "entry_class_id",
    /// "participant_name", "submitted_at"} per line.
    Entries,
}
