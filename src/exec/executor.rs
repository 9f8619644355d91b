// src/exec/executor.rs

//! The graph execution engine.
//!
//! [`GraphExecutor`] drives one task graph to completion: for each task it
//! fans out over the dependents, joins on all of them, hands the body off to
//! the task's lane, fans out over the dependencies (which the body may have
//! discovered), and finally applies the task's reliance policy to decide
//! success. Sibling tasks in one batch run concurrently with no ordering
//! between them; within one task the ordering is fixed.
//!
//! Cancellation is cooperative: `cancel()` sets a run-wide flag checked at
//! the top of every task execution and after every batch submission, and
//! aborts the in-flight lane hand-offs best-effort. Bodies that want to stop
//! promptly must poll the injected predicate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, error, trace, warn};

use crate::cancel::CancelFlag;
use crate::errors::TaskError;
use crate::exec::backend::{LaneId, Unit, WorkerPool};
use crate::exec::pool::TokioPool;
use crate::exec::registry::HandleRegistry;
use crate::listener::TaskListener;
use crate::task::{TaskNode, TaskState, WorkContext};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Which stage of a task a lane hand-off runs.
#[derive(Debug, Clone, Copy)]
enum Stage {
    Pre,
    Body,
    Post,
}

pub struct GraphExecutor {
    root: Arc<TaskNode>,
    pool: Arc<dyn WorkerPool>,
    listeners: Vec<Arc<dyn TaskListener>>,
    driver_lane: LaneId,
    cancelled: CancelFlag,
    registry: HandleRegistry,
    total_tasks: AtomicUsize,
    exception: Mutex<Option<TaskError>>,
}

impl GraphExecutor {
    /// Executor over the default [`TokioPool`].
    pub fn new(root: Arc<TaskNode>) -> Self {
        Self::with_pool(root, Arc::new(TokioPool::new()))
    }

    pub fn with_pool(root: Arc<TaskNode>, pool: Arc<dyn WorkerPool>) -> Self {
        Self {
            root,
            pool,
            listeners: Vec::new(),
            driver_lane: LaneId::new("driver"),
            cancelled: CancelFlag::new(),
            registry: HandleRegistry::new(),
            total_tasks: AtomicUsize::new(0),
            exception: Mutex::new(None),
        }
    }

    /// Attach a listener. The listener list is fixed once the executor is
    /// wrapped in an `Arc` and started; notifications arrive synchronously
    /// from arbitrary worker threads, so listeners must not block for long.
    pub fn with_listener(mut self, listener: Arc<dyn TaskListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn root(&self) -> &Arc<TaskNode> {
        &self.root
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_set()
    }

    /// First non-cancellation failure observed across the whole run.
    ///
    /// Later failures stay attached to their own tasks but do not replace
    /// this one (first-failure-wins).
    pub fn exception(&self) -> Option<TaskError> {
        lock(&self.exception).clone()
    }

    /// Total tasks ever handed to the pool for execution. Diagnostic
    /// counter; monotonically increasing.
    pub fn total_tasks(&self) -> usize {
        self.total_tasks.load(Ordering::Relaxed)
    }

    /// Fire-and-forget entry point: submits the run and returns immediately.
    ///
    /// Listeners receive `on_start` now and a single `on_stop` with the
    /// final outcome when the run eventually completes. If the pool refuses
    /// the driver unit, `on_stop(false)` is delivered right away.
    pub fn start(self: &Arc<Self>) -> Arc<Self> {
        self.notify(|l| l.on_start());

        let engine = Arc::clone(self);
        let unit: Unit = Box::pin(async move {
            let ok = engine.execute_root().await;
            engine.notify(|l| l.on_stop(ok, &engine));
            Ok(())
        });

        if self.pool.submit(&self.driver_lane, unit).is_err() {
            warn!("worker pool rejected the run driver; reporting failure");
            self.notify(|l| l.on_stop(false, self));
        }
        Arc::clone(self)
    }

    /// Blocking entry point: submits the run and awaits its completion.
    ///
    /// Returns true iff the whole graph completed successfully. Expected
    /// failure and cancellation paths never escape as errors; a panic inside
    /// a task body is fatal and resumes on the caller. If the wait itself is
    /// abandoned the underlying run keeps going and the outcome captured so
    /// far is returned.
    pub async fn run(self: &Arc<Self>) -> bool {
        self.notify(|l| l.on_start());

        let outcome = Arc::new(AtomicBool::new(false));
        let engine = Arc::clone(self);
        let captured = Arc::clone(&outcome);
        let unit: Unit = Box::pin(async move {
            let ok = engine.execute_root().await;
            captured.store(ok, Ordering::SeqCst);
            engine.notify(|l| l.on_stop(ok, &engine));
            Ok(())
        });

        let handle = match self.pool.submit(&self.driver_lane, unit) {
            Ok(handle) => handle,
            Err(_) => {
                warn!("worker pool rejected the run driver; reporting failure");
                self.notify(|l| l.on_stop(false, self));
                return false;
            }
        };

        match handle.await {
            Ok(_) => {}
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // Abandoned wait: the run continues in the background.
            Err(_) => {}
        }
        outcome.load(Ordering::SeqCst)
    }

    /// Request cooperative cancellation. Idempotent and safe to call from
    /// any thread; concurrent sweeps serialize on the registry.
    ///
    /// Sets the run-wide flag, after which no new task executions are
    /// submitted, and aborts every registered in-flight lane unit
    /// best-effort. Bodies that do not poll the predicate are interrupted at
    /// their next await point.
    pub fn cancel(&self) {
        self.cancelled.set();
        self.registry.abort_all();
    }

    async fn execute_root(self: &Arc<Self>) -> bool {
        match self.execute_batch(std::slice::from_ref(&self.root)).await {
            Ok(ok) => ok,
            // Submission refused before the root ever ran.
            Err(_) => false,
        }
    }

    /// Fan-out/join over one batch of sibling tasks.
    ///
    /// Submits a wrapper per task on the driver lane and joins on all of
    /// them; one task failing does not stop its siblings, it only flips the
    /// shared success flag. `Err` means the batch was interrupted (pool
    /// rejection), which aborts the parent task rather than failing it.
    async fn execute_batch(
        self: &Arc<Self>,
        batch: &[Arc<TaskNode>],
    ) -> Result<bool, TaskError> {
        if batch.is_empty() {
            return Ok(true);
        }

        self.total_tasks.fetch_add(batch.len(), Ordering::Relaxed);
        let success = Arc::new(AtomicBool::new(true));
        let mut joins = Vec::with_capacity(batch.len());

        for (index, node) in batch.iter().enumerate() {
            if self.cancelled.is_set() {
                // Nothing past this point gets submitted; give the stragglers
                // a terminal state so the graph stays inspectable.
                for skipped in &batch[index..] {
                    skipped.set_exception(TaskError::cancelled());
                    skipped.set_state(TaskState::Failed);
                }
                return Ok(false);
            }

            let node_future = self.execute_node(Arc::clone(node));
            let batch_success = Arc::clone(&success);
            let unit: Unit = Box::pin(async move {
                if !node_future.await {
                    batch_success.store(false, Ordering::SeqCst);
                }
                Ok(())
            });

            let handle = self
                .pool
                .submit(&self.driver_lane, unit)
                .map_err(|_| TaskError::Interrupted)?;
            joins.push(handle);
        }

        if self.cancelled.is_set() {
            return Ok(false);
        }

        for handle in joins {
            match handle.await {
                Ok(_) => {}
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                // Interrupted join: stop waiting; submitted siblings keep
                // running to completion in the background.
                Err(_) => return Ok(false),
            }
        }

        Ok(success.load(Ordering::SeqCst) && !self.cancelled.is_set())
    }

    /// Execute one task: dependents, body, dependencies, policy, listeners.
    ///
    /// Boxed because the recursion ties back through `execute_batch`.
    fn execute_node(
        self: &Arc<Self>,
        node: Arc<TaskNode>,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'static>> {
        let engine = Arc::clone(self);
        Box::pin(async move {
            node.bind_cancelled(engine.cancelled.clone());

            if engine.cancelled.is_set() {
                node.set_exception(TaskError::cancelled());
                node.set_state(TaskState::Failed);
                return false;
            }

            node.set_state(TaskState::Ready);
            if node.significance().should_log() {
                debug!(task = %node.name(), "executing task");
            }
            engine.notify(|l| l.on_ready(&node));

            let mut flag = false;
            match engine.run_stages(&node).await {
                Ok(()) => {
                    flag = true;
                    if node.significance().should_log() {
                        trace!(task = %node.name(), "task finished");
                    }
                    node.work().on_done(false);
                    engine.notify(|l| l.on_finished(&node));
                }
                Err(raw) => {
                    // Strip the lane hand-off layers before classifying or
                    // recording anything.
                    let err = raw.unwrapped().clone();
                    node.set_exception(err.clone());
                    if err.is_cancellation() {
                        if node.significance().should_log() {
                            debug!(task = %node.name(), "task aborted");
                        }
                    } else {
                        engine.record_exception(&err);
                        warn!(task = %node.name(), error = %err, "task failed");
                    }
                    node.work().on_done(true);
                    engine.notify(|l| l.on_failed(&node, &err));
                }
            }

            node.set_state(if flag {
                TaskState::Succeeded
            } else {
                TaskState::Failed
            });
            flag
        })
    }

    /// The ordered stages of one task. Any `Err` aborts the task; the
    /// caller classifies it.
    async fn run_stages(self: &Arc<Self>, node: &Arc<TaskNode>) -> Result<(), TaskError> {
        if node.work().has_pre_run() {
            self.hand_off(node, Stage::Pre).await?;
        }

        let dependents = node.dependents();
        let dependents_ok = self.execute_batch(&dependents).await?;
        if (!dependents_ok && node.relies_on_dependents()) || self.cancelled.is_set() {
            return Err(TaskError::cancelled_by(first_exception(&dependents)));
        }
        if dependents_ok {
            node.work().on_dependents_succeeded();
        }

        let body = self.hand_off(node, Stage::Body).await;
        // The body attempt concluded, success or not; dependencies are
        // considered only after this point.
        node.set_state(TaskState::Executed);
        body?;

        // Snapshot after the body ran: it may have declared more.
        let dependencies = node.dependencies();
        let dependencies_ok = self.execute_batch(&dependencies).await?;
        if dependencies_ok {
            node.work().on_dependencies_succeeded();
        }

        if node.work().has_post_run() {
            self.hand_off(node, Stage::Post).await?;
        }

        if !dependencies_ok && node.relies_on_dependencies() {
            error!(task = %node.name(), "dependencies failed");
            return Err(TaskError::cancelled_by(first_exception(&dependencies)));
        }

        Ok(())
    }

    /// Run one stage of a task on its own lane and wait for it.
    ///
    /// The handle is registered for cancellation, so `cancel()` interrupts
    /// in-flight bodies and hooks here. Failures come back re-wrapped as
    /// [`TaskError::Handoff`]; an aborted unit reads as cancellation; a
    /// panicking unit is fatal and resumes on this thread.
    async fn hand_off(
        self: &Arc<Self>,
        node: &Arc<TaskNode>,
        stage: Stage,
    ) -> Result<(), TaskError> {
        let engine = Arc::clone(self);
        let task = Arc::clone(node);
        let unit: Unit = Box::pin(async move {
            let cx = WorkContext::new(Arc::clone(&task), engine.cancelled.clone());
            match stage {
                Stage::Pre => task.work().pre_run(&cx).await,
                Stage::Body => {
                    task.set_state(TaskState::Running);
                    engine.notify(|l| l.on_running(&task));
                    task.work().run(&cx).await
                }
                Stage::Post => task.work().post_run(&cx).await,
            }
        });

        let handle = self
            .pool
            .submit(node.lane(), unit)
            .map_err(|rejected| TaskError::Rejected {
                lane: rejected.lane,
            })?;
        self.registry.register(handle.abort_handle());

        match handle.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(TaskError::Handoff(Box::new(err))),
            Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
            Err(_) => Err(TaskError::cancelled()),
        }
    }

    fn record_exception(&self, err: &TaskError) {
        let mut slot = lock(&self.exception);
        if slot.is_none() {
            *slot = Some(err.clone());
        }
    }

    fn notify(&self, f: impl Fn(&dyn TaskListener)) {
        for listener in &self.listeners {
            f(listener.as_ref());
        }
    }
}

impl std::fmt::Debug for GraphExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphExecutor")
            .field("root", &self.root.name())
            .field("cancelled", &self.cancelled.is_set())
            .field("total_tasks", &self.total_tasks())
            .finish_non_exhaustive()
    }
}

fn first_exception(batch: &[Arc<TaskNode>]) -> Option<TaskError> {
    batch.iter().find_map(|task| task.exception())
}
