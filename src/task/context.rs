// src/task/context.rs

use std::sync::Arc;

use crate::cancel::CancelFlag;
use crate::errors::TaskError;
use crate::task::node::TaskNode;

/// Handle a task body or hook receives while it runs.
///
/// Carries the executor's cancellation predicate and the node itself, so a
/// body can poll for cancellation and declare dependencies it discovers
/// while running.
#[derive(Clone)]
pub struct WorkContext {
    node: Arc<TaskNode>,
    cancelled: CancelFlag,
}

impl WorkContext {
    pub(crate) fn new(node: Arc<TaskNode>, cancelled: CancelFlag) -> Self {
        Self { node, cancelled }
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    /// Poll the run-wide cancellation flag.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_set()
    }

    /// Bail out with a cancellation cause if cancellation was requested.
    /// Long-running bodies should call this between units of work.
    pub fn checkpoint(&self) -> Result<(), TaskError> {
        if self.cancelled.is_set() {
            Err(TaskError::cancelled())
        } else {
            Ok(())
        }
    }

    /// Declare a dependency discovered during the body. It will run after
    /// the body, before this task is considered done.
    pub fn require(&self, dependency: Arc<TaskNode>) {
        self.node.push_dependency(dependency);
    }
}
