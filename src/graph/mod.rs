//! Task graph construction: flattens quests into one namespaced task list.
//!
//! Every task name becomes `<quest>/<task>`. Dependencies without a `/`
//! are resolved inside the declaring quest; dependencies with one already
//! target another quest and are kept as written. Validation runs after
//! all names are known, so forward references across quests are legal.
//! Cycles are not diagnosed here.

use std::collections::HashSet;
use std::rc::Rc;

use crate::combat::Action;
use crate::context::WorldContext;
use crate::error::EngineError;
use crate::task::{Predicate, Quest, Task};

/// Separator between quest and task names.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Flattens `quests` into one validated task list in declaration order.
///
/// With `implicit_after`, a task that declares no dependency depends on
/// the task flattened right before it (across quest boundaries too).
///
/// # Errors
///
/// Returns [`EngineError::DuplicateTask`] if two tasks share a
/// namespaced name, and [`EngineError::UnknownDependency`] if any
/// dependency names no task in the flattened list.
pub fn flatten<A: Action>(
    quests: Vec<Quest<A>>,
    implicit_after: bool,
) -> Result<Vec<Task<A>>, EngineError> {
    let mut result: Vec<Task<A>> = Vec::new();
    for quest in quests {
        for mut task in quest.tasks {
            task.name = qualify(&quest.name, &task.name);
            task.after = task
                .after
                .map(|after| after.iter().map(|dep| qualify(&quest.name, dep)).collect());
            if implicit_after && task.after.is_none() {
                if let Some(previous) = result.last() {
                    task.after = Some(vec![previous.name.clone()]);
                }
            }
            if let Some(quest_completed) = &quest.completed {
                let quest_completed = Rc::clone(quest_completed);
                let task_completed = task.completed;
                task.completed =
                    Box::new(move |ctx: &WorldContext| quest_completed(ctx) || task_completed(ctx));
            }
            if let Some(quest_ready) = &quest.ready {
                let quest_ready = Rc::clone(quest_ready);
                let ready: Predicate = match task.ready.take() {
                    Some(task_ready) => {
                        Box::new(move |ctx: &WorldContext| quest_ready(ctx) && task_ready(ctx))
                    }
                    None => Box::new(move |ctx: &WorldContext| quest_ready(ctx)),
                };
                task.ready = Some(ready);
            }
            result.push(task);
        }
    }

    verify(&result)?;
    Ok(result)
}

/// Checks that names are unique and every dependency names a task in
/// `tasks`.
///
/// # Errors
///
/// Returns [`EngineError::DuplicateTask`] for the first repeated name,
/// then [`EngineError::UnknownDependency`] for the first dependency that
/// names no task.
pub fn verify<A: Action>(tasks: &[Task<A>]) -> Result<(), EngineError> {
    let mut names: HashSet<&str> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !names.insert(task.name.as_str()) {
            return Err(EngineError::DuplicateTask { task: task.name.clone() });
        }
    }
    for task in tasks {
        for dependency in task.dependencies() {
            if !names.contains(dependency.as_str()) {
                return Err(EngineError::UnknownDependency {
                    dependency: dependency.clone(),
                    task: task.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn qualify(quest: &str, name: &str) -> String {
    if name.contains(NAMESPACE_SEPARATOR) {
        name.to_string()
    } else {
        format!("{quest}{NAMESPACE_SEPARATOR}{name}")
    }
}
