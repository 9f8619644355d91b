// src/exec/pool.rs

//! Real worker pool used in production.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{Instrument, debug_span};

use crate::exec::backend::{LaneId, SubmitRejected, Unit, UnitHandle, WorkerPool};

/// Worker pool backed by the ambient tokio runtime.
///
/// Lanes are not pinned to dedicated threads (tokio's work stealing covers
/// ordinary workloads), but every unit runs inside a span naming its lane,
/// so lane attribution survives into the logs.
/// Callers that need a truly serialized lane can implement [`WorkerPool`]
/// over a channel-fed worker instead.
///
/// `submit` must be called from within a tokio runtime context.
#[derive(Debug, Default)]
pub struct TokioPool {
    closed: AtomicBool,
}

impl TokioPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop accepting new units. Already-running units are unaffected.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl WorkerPool for TokioPool {
    fn submit(&self, lane: &LaneId, unit: Unit) -> Result<UnitHandle, SubmitRejected> {
        if self.is_shut_down() {
            return Err(SubmitRejected { lane: lane.clone() });
        }
        let span = debug_span!("unit", lane = %lane);
        Ok(tokio::spawn(unit.instrument(span)))
    }
}
