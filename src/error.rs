//! Error types raised by graph construction, routing, and execution.

use std::fmt;

use crate::ports::PortError;

/// Which per-task budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Hard attempt budget.
    Tries(u32),
    /// Attempt budget that may be exceeded through plain bad luck.
    Soft(u32),
    /// Turns spent at the task's location.
    Turns(u32),
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tries(n) => write!(f, "{n} attempts. Please check what went wrong."),
            Self::Soft(n) => write!(
                f,
                "{n} attempts. Please check what went wrong (you may just be unlucky)."
            ),
            Self::Turns(n) => write!(f, "{n} turns. Please check what went wrong."),
        }
    }
}

/// Every way the engine can abort a run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An `after` entry names no task in the flattened list.
    #[error("Unknown task dependency {dependency} of {task}")]
    UnknownDependency {
        /// The dependency name that failed to resolve.
        dependency: String,
        /// The task declaring the dependency.
        task: String,
    },

    /// Two tasks share one namespaced name.
    #[error("Duplicate task {task}")]
    DuplicateTask {
        /// The repeated name.
        task: String,
    },

    /// A task name passed to the engine matches no task it holds.
    #[error("Unknown task {task}")]
    UnknownTask {
        /// The requested name.
        task: String,
    },

    /// A routing entry names no task in the flattened list.
    #[error("Unknown routing task {task}")]
    UnknownRoutingTask {
        /// The routed name.
        task: String,
    },

    /// Priority propagation walked back onto a task already on its path.
    #[error("Dependency cycle reached while routing: {}", path.join(" -> "))]
    RoutingCycle {
        /// The dependency path, ending with the repeated task.
        path: Vec<String>,
    },

    /// A required item could not be brought to the needed quantity.
    #[error("Task {task} was unable to acquire {needed} {item}")]
    UnableToAcquire {
        /// The executing task.
        task: String,
        /// The item that is still short.
        item: String,
        /// The quantity that was required.
        needed: u32,
    },

    /// A task exhausted its budget without completing.
    #[error("Task {task} did not complete within {limit}{}", message.as_ref().map(|m| format!(" {m}")).unwrap_or_default())]
    LimitExceeded {
        /// The executing task.
        task: String,
        /// The budget that ran out.
        limit: LimitKind,
        /// Author-supplied diagnostic appended to the failure.
        message: Option<String>,
    },

    /// The loadout could not be fully worn.
    #[error("Task {task} was unable to equip its full outfit")]
    Outfit {
        /// The executing task.
        task: String,
    },

    /// A task-supplied callback reported a failure.
    #[error("Task {task} failed: {message}")]
    Hook {
        /// The executing task.
        task: String,
        /// The callback's own message.
        message: String,
    },

    /// A world-mutation primitive failed.
    #[error("Task {task} failed during {operation}: {source}")]
    Port {
        /// The executing task.
        task: String,
        /// The primitive that failed (e.g. "adventure").
        operation: &'static str,
        /// The underlying port error.
        #[source]
        source: PortError,
    },
}

impl EngineError {
    /// Name of the task the error is attributed to, when there is one.
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        match self {
            Self::UnknownDependency { task, .. }
            | Self::DuplicateTask { task }
            | Self::UnknownTask { task }
            | Self::UnknownRoutingTask { task }
            | Self::UnableToAcquire { task, .. }
            | Self::LimitExceeded { task, .. }
            | Self::Outfit { task }
            | Self::Hook { task, .. }
            | Self::Port { task, .. } => Some(task),
            Self::RoutingCycle { .. } => None,
        }
    }
}
