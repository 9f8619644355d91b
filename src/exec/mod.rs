// src/exec/mod.rs

//! Execution: the worker-pool abstraction and the graph executor built on
//! top of it.

pub mod backend;
pub mod executor;
pub mod pool;
mod registry;

pub use backend::{LaneId, SubmitRejected, Unit, UnitHandle, WorkerPool};
pub use executor::GraphExecutor;
pub use pool::TokioPool;
