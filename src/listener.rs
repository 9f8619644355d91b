// src/listener.rs

//! Lifecycle listener contract.

use std::sync::Arc;

use crate::errors::TaskError;
use crate::exec::GraphExecutor;
use crate::task::TaskNode;

/// Observer of task and run lifecycle events.
///
/// All methods are invoked synchronously on whichever worker reaches that
/// point, so implementations must not block significantly. For one task the
/// order is fixed: ready → running → finished | failed, with finished/failed
/// delivered exactly once per task that reached ready. Across sibling tasks
/// no ordering is guaranteed.
pub trait TaskListener: Send + Sync {
    /// The run was started.
    fn on_start(&self) {}

    /// The task is about to execute (dependents not yet resolved).
    fn on_ready(&self, _task: &Arc<TaskNode>) {}

    /// The task's body is starting on its lane.
    fn on_running(&self, _task: &Arc<TaskNode>) {}

    /// The task completed successfully, dependencies included.
    fn on_finished(&self, _task: &Arc<TaskNode>) {}

    /// The task failed or was aborted; `cause` is also recorded on the task.
    fn on_failed(&self, _task: &Arc<TaskNode>, _cause: &TaskError) {}

    /// The whole run concluded. Delivered exactly once, with the final
    /// boolean outcome.
    fn on_stop(&self, _success: bool, _executor: &GraphExecutor) {}
}
