// src/cancel.rs

//! Cooperative cancellation flag.
//!
//! The executor owns one [`CancelFlag`] per run and injects a clone into
//! every task it touches. Task bodies poll it (directly or via
//! [`WorkContext::checkpoint`](crate::task::WorkContext::checkpoint)) to
//! abort promptly; the flag is monotonic (once set it stays set).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once cancellation has been requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self) {
        self.0.store(true, Ordering::Release);
    }
}
