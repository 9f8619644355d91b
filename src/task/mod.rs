// src/task/mod.rs

//! The task graph data model: lifecycle states, nodes, and the caller-side
//! [`Work`] contract the executor drives.

pub mod context;
pub mod node;
pub mod state;
pub mod work;

pub use context::WorkContext;
pub use node::{TaskNode, TaskNodeBuilder};
pub use state::{Significance, TaskState};
pub use work::{FnWork, Work};
