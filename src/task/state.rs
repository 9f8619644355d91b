// src/task/state.rs

use std::fmt;

/// Lifecycle state of a task.
///
/// Legal transitions: `Created → Ready → Running → Executed →
/// {Succeeded | Failed}`. A task may also go straight to `Failed` when
/// cancellation is observed before its body runs. `Executed` is reached
/// unconditionally once the body attempt concludes (success or failure) and
/// is not terminal: dependencies still run after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Ready,
    Running,
    Executed,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Created => "created",
            TaskState::Ready => "ready",
            TaskState::Running => "running",
            TaskState::Executed => "executed",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Logging-verbosity tier of a task.
///
/// Consulted only to decide whether the executor emits per-task diagnostic
/// lines; never changes control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Significance {
    Major,
    #[default]
    Moderate,
    Minor,
}

impl Significance {
    pub fn should_log(self) -> bool {
        self != Significance::Minor
    }
}
