//! Priority-based reordering of a flat task list.
//!
//! Each routed task takes its index in the route as priority; its direct
//! dependencies take `index - 0.01`, their dependencies `index - 0.02`,
//! and so on, so prerequisites of a routed task always sort before it.
//! Unmentioned tasks keep [`UNROUTED_PRIORITY`]. The final sort is stable.

use std::collections::HashMap;

use crate::combat::Action;
use crate::error::EngineError;
use crate::task::Task;

/// Priority of a task the route never reaches.
pub const UNROUTED_PRIORITY: f64 = 1000.0;

/// Priority drop per dependency level below a routed task.
const DEPENDENCY_STEP: f64 = 0.01;

/// Reorders `tasks` by the preferred visitation order in `routing`.
///
/// # Errors
///
/// Returns [`EngineError::UnknownRoutingTask`] for a routed name that is
/// not in `tasks` (unless `ignore_missing` is set),
/// [`EngineError::UnknownDependency`] for a dependency of a routed task
/// that is not in `tasks`, and [`EngineError::RoutingCycle`] if priority
/// propagation walks back onto a task already on its dependency path.
pub fn order_by_route<A: Action, S: AsRef<str>>(
    tasks: Vec<Task<A>>,
    routing: &[S],
    ignore_missing: bool,
) -> Result<Vec<Task<A>>, EngineError> {
    let by_name: HashMap<&str, &Task<A>> = tasks.iter().map(|t| (t.name.as_str(), t)).collect();
    let mut priorities: HashMap<String, f64> =
        tasks.iter().map(|t| (t.name.clone(), UNROUTED_PRIORITY)).collect();

    let mut router = Router { by_name: &by_name, priorities: &mut priorities };
    for (index, name) in routing.iter().enumerate() {
        let name = name.as_ref();
        let Some(task) = by_name.get(name).copied() else {
            if ignore_missing {
                continue;
            }
            return Err(EngineError::UnknownRoutingTask { task: name.to_string() });
        };
        #[allow(clippy::cast_precision_loss)]
        let priority = index as f64;
        router.set_priority(task, priority, &mut Vec::new())?;
    }

    let mut tasks = tasks;
    tasks.sort_by(|a, b| priority_of(&priorities, a).total_cmp(&priority_of(&priorities, b)));
    Ok(tasks)
}

fn priority_of<A: Action>(priorities: &HashMap<String, f64>, task: &Task<A>) -> f64 {
    priorities.get(&task.name).copied().unwrap_or(UNROUTED_PRIORITY)
}

struct Router<'a, A: Action> {
    by_name: &'a HashMap<&'a str, &'a Task<A>>,
    priorities: &'a mut HashMap<String, f64>,
}

impl<'a, A: Action> Router<'a, A> {
    fn set_priority(
        &mut self,
        task: &'a Task<A>,
        priority: f64,
        path: &mut Vec<String>,
    ) -> Result<(), EngineError> {
        let name = task.name.as_str();
        if path.iter().any(|p| p == name) {
            let mut cycle = path.clone();
            cycle.push(name.to_string());
            return Err(EngineError::RoutingCycle { path: cycle });
        }
        let current = self.priorities.get(name).copied().unwrap_or(UNROUTED_PRIORITY);
        if current <= priority {
            return Ok(());
        }
        self.priorities.insert(name.to_string(), priority);

        path.push(name.to_string());
        for dependency in task.dependencies() {
            let Some(prerequisite) = self.by_name.get(dependency.as_str()).copied() else {
                return Err(EngineError::UnknownDependency {
                    dependency: dependency.clone(),
                    task: name.to_string(),
                });
            };
            self.set_priority(prerequisite, priority - DEPENDENCY_STEP, path)?;
        }
        path.pop();
        Ok(())
    }
}
