//! In-memory engine
//!
//! Data lives in copy-on-write tree indexes (see `index::TreeIndex`), so the
//! engine-wide read view carries no data of its own. It only tracks how many
//! read views are open, which bounds how long superseded tree copies may be
//! kept alive.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::errors::{EngineError, EngineResult};
use super::{Engine, EngineReadView};
use crate::read_view::ReadViewOptions;

/// In-memory storage engine.
#[derive(Debug)]
pub struct MemoryEngine {
    name: String,
    supports_read_view: bool,
    read_view_limit: Option<usize>,
    open_read_views: Arc<AtomicUsize>,
}

impl MemoryEngine {
    /// Creates an engine that supports read views.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_read_view: true,
            read_view_limit: None,
            open_read_views: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates an engine without read view support.
    pub fn without_read_views(name: impl Into<String>) -> Self {
        Self {
            supports_read_view: false,
            ..Self::new(name)
        }
    }

    /// Caps the number of simultaneously open read views.
    pub fn with_read_view_limit(mut self, limit: usize) -> Self {
        self.read_view_limit = Some(limit);
        self
    }

    /// Returns the number of read views currently open on this engine.
    pub fn open_read_views(&self) -> usize {
        self.open_read_views.load(Ordering::Acquire)
    }
}

impl Engine for MemoryEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_read_view(&self) -> bool {
        self.supports_read_view
    }

    fn create_read_view(&self, _opts: &ReadViewOptions) -> EngineResult<Box<dyn EngineReadView>> {
        if !self.supports_read_view {
            return Err(EngineError::ReadViewUnsupported(self.name.clone()));
        }
        let limit = self.read_view_limit.unwrap_or(usize::MAX);
        self.open_read_views
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |open| {
                (open < limit).then_some(open + 1)
            })
            .map_err(|_| EngineError::ReadViewLimit {
                engine: self.name.clone(),
                limit,
            })?;

        Ok(Box::new(MemoryEngineReadView {
            engine_name: self.name.clone(),
            open_read_views: Arc::clone(&self.open_read_views),
        }))
    }
}

/// Engine-wide read view of a `MemoryEngine`.
#[derive(Debug)]
pub struct MemoryEngineReadView {
    engine_name: String,
    open_read_views: Arc<AtomicUsize>,
}

impl EngineReadView for MemoryEngineReadView {
    fn engine_name(&self) -> &str {
        &self.engine_name
    }
}

impl Drop for MemoryEngineReadView {
    fn drop(&mut self) {
        self.open_read_views.fetch_sub(1, Ordering::AcqRel);
    }
}
