#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dagrun::{TaskError, TaskNode};

/// Shared log of body executions, in completion-start order.
pub type ExecutionLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> ExecutionLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &ExecutionLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A task whose body succeeds immediately.
pub fn leaf(name: &str) -> Arc<TaskNode> {
    TaskNode::builder(name).body(|_cx| async { Ok(()) }).build()
}

/// A task whose body fails with the given message.
pub fn failing(name: &str, message: &str) -> Arc<TaskNode> {
    let message = message.to_string();
    TaskNode::builder(name)
        .body(move |_cx| {
            let message = message.clone();
            async move { Err(TaskError::failure(anyhow::anyhow!(message))) }
        })
        .build()
}

/// A task that records its name in `log` when its body runs, after an
/// optional delay. Useful for asserting execution order across a graph.
pub fn recorded(name: &str, delay: Duration, log: ExecutionLog) -> Arc<TaskNode> {
    TaskNode::builder(name)
        .body(move |cx| {
            let log = Arc::clone(&log);
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                log.lock().unwrap().push(cx.name().to_string());
                Ok(())
            }
        })
        .build()
}

/// A task that records its name and then fails, after an optional delay.
pub fn recorded_failing(name: &str, delay: Duration, log: ExecutionLog) -> Arc<TaskNode> {
    TaskNode::builder(name)
        .body(move |cx| {
            let log = Arc::clone(&log);
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let name = cx.name().to_string();
                log.lock().unwrap().push(name.clone());
                Err(TaskError::failure(anyhow::anyhow!("{name} failed")))
            }
        })
        .build()
}
