// src/task/work.rs

//! The caller-side contract for what a task actually does.
//!
//! The executor never knows how a body computes its result; it only drives
//! this trait: an optional pre-hook, the main body, an optional post-hook,
//! and a handful of notifications. Hooks and the body all run on the task's
//! execution lane, handed off synchronously by the executor.

use std::future::Future;

use async_trait::async_trait;

use crate::errors::TaskError;
use crate::task::context::WorkContext;

#[async_trait]
pub trait Work: Send + Sync {
    /// The main body. Runs after every dependent resolved and before any
    /// dependency does.
    async fn run(&self, cx: &WorkContext) -> Result<(), TaskError>;

    /// Whether [`Work::pre_run`] should be handed off before the dependents
    /// fan out.
    fn has_pre_run(&self) -> bool {
        false
    }

    async fn pre_run(&self, _cx: &WorkContext) -> Result<(), TaskError> {
        Ok(())
    }

    /// Whether [`Work::post_run`] should be handed off after the
    /// dependencies resolve.
    fn has_post_run(&self) -> bool {
        false
    }

    async fn post_run(&self, _cx: &WorkContext) -> Result<(), TaskError> {
        Ok(())
    }

    /// Every dependent finished successfully; the body may consume their
    /// results. Not invoked if the dependent batch failed, even when the
    /// task tolerates that failure.
    fn on_dependents_succeeded(&self) {}

    /// Every dependency finished successfully.
    fn on_dependencies_succeeded(&self) {}

    /// Unordered completion notification; `failed` mirrors the final state.
    fn on_done(&self, _failed: bool) {}
}

/// Adapter turning an async closure into a body-only [`Work`].
///
/// The closure receives an owned [`WorkContext`] so the returned future does
/// not borrow from the adapter.
pub struct FnWork<F> {
    body: F,
}

impl<F> FnWork<F> {
    pub fn new(body: F) -> Self {
        Self { body }
    }
}

#[async_trait]
impl<F, Fut> Work for FnWork<F>
where
    F: Fn(WorkContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), TaskError>> + Send,
{
    async fn run(&self, cx: &WorkContext) -> Result<(), TaskError> {
        (self.body)(cx.clone()).await
    }
}

/// Body that does nothing, for pure grouping nodes.
pub(crate) struct NoopWork;

#[async_trait]
impl Work for NoopWork {
    async fn run(&self, _cx: &WorkContext) -> Result<(), TaskError> {
        Ok(())
    }
}
