//! Read view counters
//!
//! - Counters only, monotonic
//! - Relaxed atomics; exactness across threads is not required
//! - `open_read_views` is derived from opened minus closed

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of read view counters.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    read_views_opened: AtomicU64,
    read_views_closed: AtomicU64,
    open_failures: AtomicU64,
    activations: AtomicU64,
    activation_failures: AtomicU64,
    space_read_views: AtomicU64,
    index_read_views: AtomicU64,
    results_upgraded: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a successfully opened read view
    pub fn increment_opened(&self) {
        self.read_views_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a closed read view
    pub fn increment_closed(&self) {
        self.read_views_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed open
    pub fn increment_open_failures(&self) {
        self.open_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a successful activation
    pub fn increment_activations(&self) {
        self.activations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed activation
    pub fn increment_activation_failures(&self) {
        self.activation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Add space and index read views created by one open
    pub fn add_snapshots(&self, spaces: u64, indexes: u64) {
        self.space_read_views.fetch_add(spaces, Ordering::Relaxed);
        self.index_read_views.fetch_add(indexes, Ordering::Relaxed);
    }

    /// Count a result converted by a space upgrade
    pub fn increment_results_upgraded(&self) {
        self.results_upgraded.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of read views opened and not yet closed
    pub fn open_read_views(&self) -> u64 {
        let opened = self.read_views_opened.load(Ordering::Relaxed);
        let closed = self.read_views_closed.load(Ordering::Relaxed);
        opened.saturating_sub(closed)
    }

    /// Current values of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            read_views_opened: self.read_views_opened.load(Ordering::Relaxed),
            read_views_closed: self.read_views_closed.load(Ordering::Relaxed),
            open_failures: self.open_failures.load(Ordering::Relaxed),
            activations: self.activations.load(Ordering::Relaxed),
            activation_failures: self.activation_failures.load(Ordering::Relaxed),
            space_read_views: self.space_read_views.load(Ordering::Relaxed),
            index_read_views: self.index_read_views.load(Ordering::Relaxed),
            results_upgraded: self.results_upgraded.load(Ordering::Relaxed),
        }
    }

    /// Current values of all counters as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub read_views_opened: u64,
    pub read_views_closed: u64,
    pub open_failures: u64,
    pub activations: u64,
    pub activation_failures: u64,
    pub space_read_views: u64,
    pub index_read_views: u64,
    pub results_upgraded: u64,
}
