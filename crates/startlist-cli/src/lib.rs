//! Start list CLI library.
//!
//! This crate provides the CLI interface for start list scheduling.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ImportKind, RaceArgs};
pub use config::Config;
