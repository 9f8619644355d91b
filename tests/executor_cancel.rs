mod common;
use crate::common::{init_tracing, wait_for_state, wait_for_stop, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use dagrun::{GraphExecutor, TaskError, TaskNode, TaskState};
use dagrun_test_utils::builders::leaf;
use dagrun_test_utils::recording::RecordingListener;
use tokio::sync::Notify;

#[tokio::test]
async fn cancel_before_run_fails_the_root_with_a_cancellation_cause() {
    init_tracing();

    let root = leaf("root");
    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)));

    engine.cancel();
    assert!(!engine.run().await);

    assert_eq!(root.state(), TaskState::Failed);
    let err = root.exception().expect("cancellation recorded");
    assert!(matches!(err, TaskError::Cancelled { cause: None }));

    // Cancellation never becomes the engine's terminal exception.
    assert!(engine.exception().is_none());
}

#[tokio::test]
async fn cancel_before_start_reports_stop_false() {
    init_tracing();

    let root = leaf("root");
    let listener = RecordingListener::new();
    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)).with_listener(listener.clone()));

    engine.cancel();
    engine.start();

    assert!(!wait_for_stop(&listener).await);
    assert_eq!(root.state(), TaskState::Failed);
}

#[tokio::test]
async fn cancel_mid_run_submits_nothing_new() {
    init_tracing();

    // D1 signals once its body is running, then waits for cancellation.
    let started = Arc::new(Notify::new());
    let started_tx = Arc::clone(&started);
    let d1 = TaskNode::builder("D1")
        .body(move |cx| {
            let started = Arc::clone(&started_tx);
            async move {
                started.notify_one();
                loop {
                    cx.checkpoint()?;
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        })
        .build();

    // D2 would only be dispatched after R's body; it must never be.
    let d2 = leaf("D2");
    let root = TaskNode::builder("R")
        .dependent(Arc::clone(&d1))
        .dependency(Arc::clone(&d2))
        .build();

    let listener = RecordingListener::new();
    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)).with_listener(listener.clone()));

    let run = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run().await })
    };

    with_timeout(started.notified()).await;
    engine.cancel();

    assert!(!run.await.expect("run task completed"));
    assert_eq!(d1.state(), TaskState::Failed);
    assert_eq!(root.state(), TaskState::Failed);
    assert_eq!(d2.state(), TaskState::Created, "D2 was submitted after cancel");
    assert_eq!(listener.stopped(), Some(false));
    assert!(engine.exception().is_none());
    assert!(engine.is_cancelled());
}

#[tokio::test]
async fn cancel_aborts_a_body_that_never_polls() {
    init_tracing();

    // This body never looks at the cancellation predicate; the registry
    // abort has to interrupt it at its await point.
    let root = TaskNode::builder("sleeper")
        .body(|_cx| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .build();

    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)));
    let run = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run().await })
    };

    wait_for_state(&root, TaskState::Running).await;
    engine.cancel();

    assert!(!run.await.expect("run task completed"));
    assert_eq!(root.state(), TaskState::Failed);
    assert!(root.exception().expect("cause recorded").is_cancellation());
}

#[tokio::test]
async fn concurrent_double_cancel_is_idempotent() {
    init_tracing();

    let root = TaskNode::builder("sleeper")
        .body(|_cx| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .build();

    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)));
    let run = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run().await })
    };

    wait_for_state(&root, TaskState::Running).await;

    let first = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.cancel() })
    };
    let second = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.cancel() })
    };
    first.await.expect("first cancel");
    second.await.expect("second cancel");

    assert!(!run.await.expect("run task completed"));
    assert_eq!(root.state(), TaskState::Failed);

    // A later sweep over the already-drained registry is a no-op.
    engine.cancel();
    assert!(engine.is_cancelled());
}
