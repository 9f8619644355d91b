mod common;
use crate::common::{init_tracing, wait_for_stop};

use std::sync::Arc;

use dagrun::{GraphExecutor, TaskState};
use dagrun_test_utils::builders::{failing, leaf};
use dagrun_test_utils::recording::{Event, RecordingListener};

#[tokio::test]
async fn single_task_succeeds() {
    init_tracing();

    let root = leaf("root");
    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)));

    assert!(engine.run().await);
    assert_eq!(root.state(), TaskState::Succeeded);
    assert!(root.exception().is_none());
    assert!(engine.exception().is_none());
    assert_eq!(engine.total_tasks(), 1);
}

#[tokio::test]
async fn single_failing_task_fails_the_run() {
    init_tracing();

    let root = failing("root", "root exploded");
    let engine = Arc::new(GraphExecutor::new(Arc::clone(&root)));

    assert!(!engine.run().await);
    assert_eq!(root.state(), TaskState::Failed);

    let task_err = root.exception().expect("failure recorded on the task");
    assert_eq!(task_err.root_cause().to_string(), "root exploded");

    // Real failures are promoted to the engine-level terminal exception.
    let engine_err = engine.exception().expect("failure promoted to the engine");
    assert_eq!(engine_err.root_cause().to_string(), "root exploded");
}

#[tokio::test]
async fn run_graph_convenience_entry_point() {
    init_tracing();
    assert!(dagrun::run_graph(leaf("root")).await);
}

#[tokio::test]
async fn listener_sequence_for_a_single_task() {
    init_tracing();

    let root = leaf("root");
    let listener = RecordingListener::new();
    let engine = Arc::new(
        GraphExecutor::new(root).with_listener(listener.clone()),
    );

    assert!(engine.run().await);
    assert_eq!(
        listener.events(),
        vec![
            Event::Start,
            Event::Ready("root".into()),
            Event::Running("root".into()),
            Event::Finished("root".into()),
            Event::Stop(true),
        ]
    );
}

#[tokio::test]
async fn failed_task_notifies_on_failed_not_on_finished() {
    init_tracing();

    let root = failing("root", "nope");
    let listener = RecordingListener::new();
    let engine = Arc::new(
        GraphExecutor::new(root).with_listener(listener.clone()),
    );

    assert!(!engine.run().await);

    let events = listener.events();
    assert!(events.contains(&Event::Failed("root".into())));
    assert!(!events.contains(&Event::Finished("root".into())));
    assert_eq!(listener.stopped(), Some(false));
}

#[tokio::test]
async fn start_is_fire_and_forget() {
    init_tracing();

    let root = leaf("root");
    let listener = RecordingListener::new();
    let engine = Arc::new(
        GraphExecutor::new(Arc::clone(&root))
            .with_listener(listener.clone()),
    );

    // Returns immediately; on_start is already delivered.
    engine.start();
    assert!(listener.index_of(&Event::Start).is_some());

    assert!(wait_for_stop(&listener).await);
    assert_eq!(root.state(), TaskState::Succeeded);
}
