//! A listener that records every lifecycle notification.

use std::sync::{Arc, Mutex};

use dagrun::{GraphExecutor, TaskError, TaskListener, TaskNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Ready(String),
    Running(String),
    Finished(String),
    Failed(String),
    Stop(bool),
}

#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Final outcome from the stop notification, if it arrived yet.
    pub fn stopped(&self) -> Option<bool> {
        self.events().iter().find_map(|e| match e {
            Event::Stop(ok) => Some(*ok),
            _ => None,
        })
    }

    /// Position of the first occurrence of `event`, or None.
    pub fn index_of(&self, event: &Event) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl TaskListener for RecordingListener {
    fn on_start(&self) {
        self.push(Event::Start);
    }

    fn on_ready(&self, task: &Arc<TaskNode>) {
        self.push(Event::Ready(task.name().to_string()));
    }

    fn on_running(&self, task: &Arc<TaskNode>) {
        self.push(Event::Running(task.name().to_string()));
    }

    fn on_finished(&self, task: &Arc<TaskNode>) {
        self.push(Event::Finished(task.name().to_string()));
    }

    fn on_failed(&self, task: &Arc<TaskNode>, _cause: &TaskError) {
        self.push(Event::Failed(task.name().to_string()));
    }

    fn on_stop(&self, success: bool, _executor: &GraphExecutor) {
        self.push(Event::Stop(success));
    }
}
