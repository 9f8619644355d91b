// src/exec/backend.rs

//! Pluggable worker-pool abstraction.
//!
//! The executor talks to a [`WorkerPool`] instead of spawning directly.
//! This makes it easy to swap in a fake pool in tests while keeping the
//! production pool implementation in [`pool`](crate::exec::pool).
//!
//! - [`TokioPool`](crate::exec::TokioPool) is the default implementation:
//!   it spawns every unit on the ambient tokio runtime.
//! - Tests can provide their own `WorkerPool` that, for example, records
//!   which lanes were used or rejects submissions partway through a batch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::errors::TaskError;

/// A unit of work bound for a pool lane.
pub type Unit = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Handle to a submitted unit: awaitable for its outcome, abortable for
/// best-effort interruption.
pub type UnitHandle = JoinHandle<Result<(), TaskError>>;

/// Opaque name of a worker-pool lane.
///
/// Distinct tasks may require distinct lanes (say, a serialized "ui" lane
/// next to a "work" lane); the executor only routes by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaneId(Arc<str>);

impl LaneId {
    pub fn new(name: impl AsRef<str>) -> Self {
        LaneId(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LaneId {
    fn default() -> Self {
        LaneId::new("default")
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The pool refused a submission, e.g. because it is shutting down.
///
/// Signaled distinctly from unit failure so the executor can treat it as an
/// interruption of the current batch rather than a task-level failure.
#[derive(Debug, Clone, Error)]
#[error("worker pool rejected submission to lane '{lane}'")]
pub struct SubmitRejected {
    pub lane: LaneId,
}

/// Contract the executor requires from a worker pool.
///
/// Implementations must be callable concurrently from many threads and safe
/// to call from within a unit the pool is currently running (the executor
/// submits recursive sub-batches that way).
pub trait WorkerPool: Send + Sync {
    /// Submit a unit of work to run on the given lane.
    fn submit(&self, lane: &LaneId, unit: Unit) -> Result<UnitHandle, SubmitRejected>;
}
