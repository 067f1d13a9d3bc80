//! State shared by a read view and everything it owns

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crate::observability::MetricsRegistry;

/// Owner slot and counters of one read view.
///
/// Space and index read views hold a reference so they can check, without a
/// pointer back to the root, that they are used by the owning thread.
#[derive(Debug)]
pub(crate) struct ViewState {
    owner: Mutex<Option<ThreadId>>,
    metrics: Arc<MetricsRegistry>,
}

impl ViewState {
    pub(crate) fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            owner: Mutex::new(None),
            metrics,
        }
    }

    /// Thread that activated the read view.
    pub(crate) fn owner(&self) -> Option<ThreadId> {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_owner(&self, owner: Option<ThreadId>) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = owner;
    }

    /// Whether the calling thread owns the read view.
    pub(crate) fn is_owned_by_current(&self) -> bool {
        self.owner() == Some(thread::current().id())
    }

    pub(crate) fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}
