#![allow(dead_code)]

pub use dagrun_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use dagrun::{TaskNode, TaskState};
use dagrun_test_utils::recording::RecordingListener;

/// Poll until the run's stop notification arrives, returning its outcome.
pub async fn wait_for_stop(listener: &RecordingListener) -> bool {
    for _ in 0..500 {
        if let Some(ok) = listener.stopped() {
            return ok;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run did not deliver a stop notification");
}

/// Poll until a task reaches the given state.
pub async fn wait_for_state(task: &Arc<TaskNode>, state: TaskState) {
    for _ in 0..500 {
        if task.state() == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {} never reached {state} (is {})", task.name(), task.state());
}
