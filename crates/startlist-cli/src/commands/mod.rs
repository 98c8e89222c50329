//! CLI subcommand implementations.

pub mod assign;
pub mod configure;
pub mod discard;
pub mod finalize;
pub mod import;
pub mod list;
pub mod schedule;
pub mod show;
pub mod util;
