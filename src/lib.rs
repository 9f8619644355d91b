// src/lib.rs

//! `dagrun` is a dependency-aware task execution engine.
//!
//! Given a root [`TaskNode`] whose execution may recursively require other
//! tasks, [`GraphExecutor`] runs the resulting graph to completion, to first
//! unrecoverable failure, or to cancellation: dependents resolve before a
//! task's body, dependencies (possibly discovered by the body) resolve
//! after it, sibling batches fan out in parallel and join, and a per-task
//! reliance policy decides whether failures below propagate up.
//!
//! Task bodies run on a caller-supplied [`WorkerPool`]; lifecycle
//! notifications go to [`TaskListener`]s; cancellation is cooperative via a
//! run-wide flag that bodies poll.

pub mod cancel;
pub mod errors;
pub mod exec;
pub mod listener;
pub mod logging;
pub mod task;

use std::sync::Arc;

pub use cancel::CancelFlag;
pub use errors::TaskError;
pub use exec::{GraphExecutor, LaneId, SubmitRejected, TokioPool, Unit, UnitHandle, WorkerPool};
pub use listener::TaskListener;
pub use task::{FnWork, Significance, TaskNode, TaskNodeBuilder, TaskState, Work, WorkContext};

/// Convenience entry point: run one graph on the default pool, blocking
/// until it completes.
///
/// Returns true iff the whole graph succeeded. For listeners, cancellation
/// or a custom pool, build a [`GraphExecutor`] directly.
pub async fn run_graph(root: Arc<TaskNode>) -> bool {
    Arc::new(GraphExecutor::new(root)).run().await
}
