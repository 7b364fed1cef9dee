//! `questline run` command.

use std::fs;
use std::path::Path;

use crate::config::EngineConfig;
use crate::context::WorldContext;
use crate::engine::Engine;
use crate::route::order_by_route;
use crate::scenario::{default_macro, ScenarioAction};

/// Execute the `run` command against the scenario's simulated world.
///
/// # Errors
///
/// Returns an error string if the scenario cannot be loaded, routing or
/// any task execution fails, or the report cannot be written.
pub fn run(
    config: &EngineConfig,
    path: &Path,
    max_actions: Option<usize>,
    report: Option<&Path>,
) -> Result<(), String> {
    let scenario = super::load(path)?;
    let tasks = scenario.tasks().map_err(|err| err.to_string())?;
    let tasks = order_by_route(tasks, &scenario.route, false).map_err(|err| err.to_string())?;

    let world = scenario.world();
    let ctx = WorldContext::simulated(&world);
    let options = config.engine_options::<ScenarioAction>().with_combat_defaults(default_macro);
    let mut engine = Engine::with_hooks(&ctx, tasks, options, scenario.hooks());
    let summary = engine.run(max_actions).map_err(|err| err.to_string())?;
    drop(engine);

    for name in &summary.executed {
        println!("executed {name}");
    }
    if summary.remaining.is_empty() {
        println!("all tasks completed");
    } else {
        println!("remaining: {}", summary.remaining.join(", "));
    }

    if let Some(report) = report {
        let yaml = serde_yaml::to_string(&summary).map_err(|err| err.to_string())?;
        fs::write(report, yaml)
            .map_err(|err| format!("failed to write report {}: {err}", report.display()))?;
    }
    Ok(())
}
