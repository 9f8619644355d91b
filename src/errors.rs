// src/errors.rs

//! Crate-wide error types.
//!
//! A failure can travel through several layers before anyone looks at it:
//! a task body raises it, a lane hand-off re-wraps it, and a parent task
//! attaches it as the reason for its own abort. Rather than nesting opaque
//! wrapper types, the wrapping is explicit in the [`TaskError`] sum type:
//! [`TaskError::Handoff`] marks a lane hand-off layer and
//! [`TaskError::Cancelled`] can carry the failure that triggered an abort.
//! [`TaskError::unwrapped`] and [`TaskError::root_cause`] peel those layers
//! back off.
//!
//! All variants are cheap to clone (`Arc`/`Box` payloads), so the same cause
//! can be attached to a task, its parent, and the executor at once.

use std::sync::Arc;

use thiserror::Error;

use crate::exec::LaneId;

pub type Result<T> = std::result::Result<T, TaskError>;

#[derive(Debug, Clone, Error)]
pub enum TaskError {
    /// Cooperative cancellation. Carries the failure that triggered the
    /// abort when there was one (e.g. a failed dependent batch).
    #[error("task cancelled")]
    Cancelled { cause: Option<Box<TaskError>> },

    /// A batch join was abandoned before every sibling reported back.
    #[error("batch wait interrupted")]
    Interrupted,

    /// The worker pool refused a submission (shutting down).
    #[error("worker pool rejected submission to lane '{lane}'")]
    Rejected { lane: LaneId },

    /// A failure re-wrapped by a synchronous lane hand-off.
    #[error("lane hand-off failed")]
    Handoff(#[source] Box<TaskError>),

    /// A failure raised by a task body or hook.
    #[error("{0}")]
    Failure(Arc<anyhow::Error>),
}

impl TaskError {
    /// Plain cancellation with no underlying failure.
    pub fn cancelled() -> Self {
        TaskError::Cancelled { cause: None }
    }

    /// Cancellation caused by an observed failure, typically the first
    /// exception captured in a failed dependent/dependency batch.
    pub fn cancelled_by(cause: Option<TaskError>) -> Self {
        TaskError::Cancelled {
            cause: cause.map(Box::new),
        }
    }

    /// A task-level failure from any error type.
    pub fn failure(err: impl Into<anyhow::Error>) -> Self {
        TaskError::Failure(Arc::new(err.into()))
    }

    /// Strip lane hand-off wrappers, leaving the error the unit itself
    /// produced.
    pub fn unwrapped(&self) -> &TaskError {
        let mut cur = self;
        while let TaskError::Handoff(inner) = cur {
            cur = inner;
        }
        cur
    }

    /// Resolve to the root cause: strips hand-off wrappers *and* follows
    /// cancellation causes down to the failure that started it all.
    pub fn root_cause(&self) -> &TaskError {
        let mut cur = self;
        loop {
            match cur {
                TaskError::Handoff(inner) => cur = inner,
                TaskError::Cancelled { cause: Some(inner) } => cur = inner,
                _ => return cur,
            }
        }
    }

    /// True for the quiet taxonomy: cancellation, an interrupted join, or a
    /// pool rejection. These never become the executor's terminal exception.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self.unwrapped(),
            TaskError::Cancelled { .. } | TaskError::Interrupted | TaskError::Rejected { .. }
        )
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        TaskError::Failure(Arc::new(err))
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        TaskError::failure(err)
    }
}
