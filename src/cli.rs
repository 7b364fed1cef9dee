//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `questline`.
#[derive(Debug, Parser)]
#[command(name = "questline", version, about = "Drive quest scenarios to completion")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build and validate a scenario's task graph.
    Check {
        /// Scenario file.
        scenario: PathBuf,
    },
    /// Print the routed task order.
    Plan {
        /// Scenario file.
        scenario: PathBuf,
        /// Preferred task order; overrides the scenario's route.
        #[arg(long = "route", value_name = "NAME")]
        route: Vec<String>,
        /// Skip routed names that match no task.
        #[arg(long)]
        ignore_missing: bool,
    },
    /// Execute a scenario against its simulated world.
    Run {
        /// Scenario file.
        scenario: PathBuf,
        /// Stop after this many task executions.
        #[arg(long)]
        actions: Option<usize>,
        /// Write the run summary as YAML to this file.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}
