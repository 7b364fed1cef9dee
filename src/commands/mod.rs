//! Command dispatch and handlers.

pub mod check;
pub mod plan;
pub mod run;

use std::path::Path;

use crate::cli::Command;
use crate::config::EngineConfig;
use crate::scenario::Scenario;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = EngineConfig::from_env();
    match command {
        Command::Check { scenario } => check::run(scenario),
        Command::Plan { scenario, route, ignore_missing } => {
            plan::run(scenario, route, *ignore_missing)
        }
        Command::Run { scenario, actions, report } => {
            run::run(&config, scenario, *actions, report.as_deref())
        }
    }
}

/// Load a scenario, mapping failures to a printable message.
fn load(path: &Path) -> Result<Scenario, String> {
    Scenario::load(path).map_err(|err| err.to_string())
}
