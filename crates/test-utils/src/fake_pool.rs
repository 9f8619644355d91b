//! Fake worker pools for executor tests.
//!
//! Both pools still spawn units on the tokio test runtime; the point is to
//! observe or perturb the *submissions*, not to reimplement scheduling.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use dagrun::{LaneId, SubmitRejected, Unit, UnitHandle, WorkerPool};

/// Records the lane of every submission, then spawns the unit normally.
#[derive(Debug, Default)]
pub struct RecordingPool {
    lanes: Mutex<Vec<String>>,
}

impl RecordingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lanes in submission order.
    pub fn submitted_lanes(&self) -> Vec<String> {
        self.lanes.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> usize {
        self.lanes.lock().unwrap().len()
    }
}

impl WorkerPool for RecordingPool {
    fn submit(&self, lane: &LaneId, unit: Unit) -> Result<UnitHandle, SubmitRejected> {
        self.lanes.lock().unwrap().push(lane.to_string());
        Ok(tokio::spawn(unit))
    }
}

/// Accepts a fixed number of submissions, then rejects everything.
///
/// Lanes marked exempt are always accepted and never counted, so a test can
/// choke the executor's driver lane while letting already-dispatched task
/// bodies run to completion.
#[derive(Debug)]
pub struct RejectingPool {
    budget: usize,
    accepted: AtomicUsize,
    exempt: Vec<LaneId>,
}

impl RejectingPool {
    pub fn rejecting_after(budget: usize) -> Self {
        Self {
            budget,
            accepted: AtomicUsize::new(0),
            exempt: Vec::new(),
        }
    }

    pub fn exempt(mut self, lane: LaneId) -> Self {
        self.exempt.push(lane);
        self
    }
}

impl WorkerPool for RejectingPool {
    fn submit(&self, lane: &LaneId, unit: Unit) -> Result<UnitHandle, SubmitRejected> {
        if !self.exempt.contains(lane) {
            let seen = self.accepted.fetch_add(1, Ordering::SeqCst);
            if seen >= self.budget {
                return Err(SubmitRejected { lane: lane.clone() });
            }
        }
        Ok(tokio::spawn(unit))
    }
}
