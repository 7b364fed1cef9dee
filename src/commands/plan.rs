//! `questline plan` command.

use std::path::Path;

use crate::route::order_by_route;

/// Execute the `plan` command, printing one task per line in routed order.
///
/// An empty `route` falls back to the scenario's own route.
///
/// # Errors
///
/// Returns an error string if the scenario cannot be loaded, its graph
/// does not validate, or routing fails.
pub fn run(path: &Path, route: &[String], ignore_missing: bool) -> Result<(), String> {
    let scenario = super::load(path)?;
    let tasks = scenario.tasks().map_err(|err| err.to_string())?;
    let route = if route.is_empty() { scenario.route.as_slice() } else { route };
    let ordered = order_by_route(tasks, route, ignore_missing).map_err(|err| err.to_string())?;

    for (position, task) in ordered.iter().enumerate() {
        let after = task.dependencies().join(", ");
        if after.is_empty() {
            println!("{:>3}. {}", position + 1, task.name);
        } else {
            println!("{:>3}. {} (after {after})", position + 1, task.name);
        }
    }
    Ok(())
}
