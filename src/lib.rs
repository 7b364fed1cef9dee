//! Core library entry for the `questline` task-orchestration engine.
//!
//! Quests are flattened into a namespaced task list ([`graph`]),
//! optionally reordered by a preferred route ([`route`]), and executed
//! one task at a time by the [`engine`] against a world reached through
//! the [`ports`].

pub mod adapters;
pub mod cli;
pub mod combat;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod graph;
pub mod outfit;
pub mod ports;
pub mod route;
pub mod scenario;
pub mod task;
pub mod world;

pub use context::WorldContext;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
