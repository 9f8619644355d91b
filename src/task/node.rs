// src/task/node.rs

//! Task graph nodes.
//!
//! A [`TaskNode`] is a unit of work plus its position in the graph:
//! *dependents* must all resolve before the body runs, *dependencies* run
//! after the body, before the task is considered done. Nodes are shared as
//! `Arc<TaskNode>` and stay inspectable after a run finishes: final state
//! and terminal exception survive the executor.
//!
//! The executor performs no acyclicity check; callers must not construct
//! cycles.

use std::sync::{Mutex, MutexGuard, PoisonError};

use std::sync::Arc;

use crate::cancel::CancelFlag;
use crate::errors::TaskError;
use crate::exec::LaneId;
use crate::task::state::{Significance, TaskState};
use crate::task::work::{FnWork, NoopWork, Work};
use crate::task::WorkContext;

/// Recover the guard from a poisoned mutex; the state behind these locks is
/// plain data, so a panicking writer cannot leave it torn.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TaskNode {
    name: String,
    lane: LaneId,
    significance: Significance,
    relies_on_dependents: bool,
    relies_on_dependencies: bool,
    work: Box<dyn Work>,
    state: Mutex<TaskState>,
    exception: Mutex<Option<TaskError>>,
    dependents: Mutex<Vec<Arc<TaskNode>>>,
    dependencies: Mutex<Vec<Arc<TaskNode>>>,
    cancelled: Mutex<Option<CancelFlag>>,
}

impl TaskNode {
    pub fn builder(name: impl Into<String>) -> TaskNodeBuilder {
        TaskNodeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lane(&self) -> &LaneId {
        &self.lane
    }

    pub fn significance(&self) -> Significance {
        self.significance
    }

    /// If true, failure of the dependent batch fails this task.
    pub fn relies_on_dependents(&self) -> bool {
        self.relies_on_dependents
    }

    /// If true, failure of the dependency batch fails this task.
    pub fn relies_on_dependencies(&self) -> bool {
        self.relies_on_dependencies
    }

    pub fn state(&self) -> TaskState {
        *lock(&self.state)
    }

    pub(crate) fn set_state(&self, state: TaskState) {
        *lock(&self.state) = state;
    }

    /// Last captured failure or cancellation cause, if any.
    pub fn exception(&self) -> Option<TaskError> {
        lock(&self.exception).clone()
    }

    pub(crate) fn set_exception(&self, err: TaskError) {
        *lock(&self.exception) = Some(err);
    }

    /// Snapshot of the dependent tasks.
    pub fn dependents(&self) -> Vec<Arc<TaskNode>> {
        lock(&self.dependents).clone()
    }

    /// Snapshot of the dependency tasks. Taken by the executor only after
    /// the body ran, since bodies may discover dependencies.
    pub fn dependencies(&self) -> Vec<Arc<TaskNode>> {
        lock(&self.dependencies).clone()
    }

    pub(crate) fn push_dependency(&self, dependency: Arc<TaskNode>) {
        lock(&self.dependencies).push(dependency);
    }

    /// Executor injects its cancellation predicate here before the task is
    /// scheduled.
    pub(crate) fn bind_cancelled(&self, flag: CancelFlag) {
        *lock(&self.cancelled) = Some(flag);
    }

    /// Poll the injected cancellation predicate. False until the executor
    /// touched the task.
    pub fn is_cancelled(&self) -> bool {
        lock(&self.cancelled)
            .as_ref()
            .is_some_and(CancelFlag::is_set)
    }

    pub(crate) fn work(&self) -> &dyn Work {
        self.work.as_ref()
    }
}

impl std::fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskNode")
            .field("name", &self.name)
            .field("lane", &self.lane)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Builder for [`TaskNode`].
///
/// Both policy flags default to true (failure below fails the task); the
/// lane defaults to [`LaneId::default`], the work to a no-op body.
pub struct TaskNodeBuilder {
    name: String,
    lane: LaneId,
    significance: Significance,
    relies_on_dependents: bool,
    relies_on_dependencies: bool,
    work: Option<Box<dyn Work>>,
    dependents: Vec<Arc<TaskNode>>,
    dependencies: Vec<Arc<TaskNode>>,
}

impl TaskNodeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lane: LaneId::default(),
            significance: Significance::default(),
            relies_on_dependents: true,
            relies_on_dependencies: true,
            work: None,
            dependents: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn lane(mut self, lane: LaneId) -> Self {
        self.lane = lane;
        self
    }

    pub fn significance(mut self, significance: Significance) -> Self {
        self.significance = significance;
        self
    }

    pub fn relies_on_dependents(mut self, relies: bool) -> Self {
        self.relies_on_dependents = relies;
        self
    }

    pub fn relies_on_dependencies(mut self, relies: bool) -> Self {
        self.relies_on_dependencies = relies;
        self
    }

    /// Add a task that must resolve before this task's body runs.
    pub fn dependent(mut self, task: Arc<TaskNode>) -> Self {
        self.dependents.push(task);
        self
    }

    /// Add a task that runs after this task's body.
    pub fn dependency(mut self, task: Arc<TaskNode>) -> Self {
        self.dependencies.push(task);
        self
    }

    pub fn work(mut self, work: impl Work + 'static) -> Self {
        self.work = Some(Box::new(work));
        self
    }

    /// Shorthand for a body-only [`Work`] built from an async closure.
    pub fn body<F, Fut>(self, body: F) -> Self
    where
        F: Fn(WorkContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.work(FnWork::new(body))
    }

    pub fn build(self) -> Arc<TaskNode> {
        Arc::new(TaskNode {
            name: self.name,
            lane: self.lane,
            significance: self.significance,
            relies_on_dependents: self.relies_on_dependents,
            relies_on_dependencies: self.relies_on_dependencies,
            work: self.work.unwrap_or_else(|| Box::new(NoopWork)),
            state: Mutex::new(TaskState::Created),
            exception: Mutex::new(None),
            dependents: Mutex::new(self.dependents),
            dependencies: Mutex::new(self.dependencies),
            cancelled: Mutex::new(None),
        })
    }
}
