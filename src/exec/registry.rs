// src/exec/registry.rs

//! Registry of in-flight cancellable handles.
//!
//! Owned by one executor for the lifetime of one run and never exposed
//! beyond it. The executor registers the abort handle of every lane
//! hand-off it submits; `cancel()` drains the registry and aborts them all.
//! Concurrent cancellation sweeps serialize on the internal lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;

#[derive(Debug, Default)]
pub(crate) struct HandleRegistry {
    entries: Mutex<Vec<AbortHandle>>,
}

impl HandleRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(&self, handle: AbortHandle) {
        let mut entries = self.lock();
        // Drop stale entries so a long run does not accumulate handles.
        entries.retain(|h| !h.is_finished());
        entries.push(handle);
    }

    /// Drain every registered handle, requesting abortion. Aborting an
    /// already-finished unit is a no-op.
    pub(crate) fn abort_all(&self) {
        let mut entries = self.lock();
        for handle in entries.drain(..) {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}
