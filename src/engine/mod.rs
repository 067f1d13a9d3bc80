//! Storage engines
//!
//! An engine hosts spaces and decides on its own how a point-in-time view of
//! its data is kept alive. The read view core only asks whether an engine
//! supports read views and, if so, asks it for one. Engines are enumerated in
//! registration order.

mod errors;
mod memory;

pub use errors::{EngineError, EngineResult};
pub use memory::{MemoryEngine, MemoryEngineReadView};

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::read_view::ReadViewOptions;

/// A pluggable storage backend.
pub trait Engine: Send + Sync {
    /// Unique engine name.
    fn name(&self) -> &str;

    /// Whether this engine can create read views.
    ///
    /// Engines returning false are skipped along with all of their spaces.
    fn supports_read_view(&self) -> bool;

    /// Creates an engine-wide read view.
    ///
    /// Only called when `supports_read_view()` is true. The returned value is
    /// destroyed by dropping it.
    fn create_read_view(&self, opts: &ReadViewOptions) -> EngineResult<Box<dyn EngineReadView>>;
}

/// Engine-wide part of a database read view.
pub trait EngineReadView: Send {
    /// Name of the engine that created this read view.
    fn engine_name(&self) -> &str;
}

/// Engines in registration order.
#[derive(Default)]
pub struct EngineRegistry {
    engines: RwLock<Vec<Arc<dyn Engine>>>,
}

impl EngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an engine. Names must be unique.
    pub fn register(&self, engine: Arc<dyn Engine>) -> EngineResult<()> {
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);
        if engines.iter().any(|e| e.name() == engine.name()) {
            return Err(EngineError::AlreadyRegistered(engine.name().to_string()));
        }
        engines.push(engine);
        Ok(())
    }

    /// Returns all engines in registration order.
    pub fn engines(&self) -> Vec<Arc<dyn Engine>> {
        self.engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Finds an engine by name.
    pub fn find(&self, name: &str) -> Option<Arc<dyn Engine>> {
        self.engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.name() == name)
            .cloned()
    }

    /// Returns the number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no engine is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.engines().iter().map(|e| e.name().to_string()).collect();
        f.debug_struct("EngineRegistry").field("engines", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order() {
        let registry = EngineRegistry::new();
        registry.register(Arc::new(MemoryEngine::new("memtx"))).unwrap();
        registry
            .register(Arc::new(MemoryEngine::without_read_views("blackhole")))
            .unwrap();

        let names: Vec<String> = registry
            .engines()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["memtx", "blackhole"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = EngineRegistry::new();
        registry.register(Arc::new(MemoryEngine::new("memtx"))).unwrap();
        let err = registry
            .register(Arc::new(MemoryEngine::new("memtx")))
            .unwrap_err();
        assert_eq!(err, EngineError::AlreadyRegistered("memtx".into()));
    }

    #[test]
    fn test_find() {
        let registry = EngineRegistry::new();
        registry.register(Arc::new(MemoryEngine::new("memtx"))).unwrap();
        assert!(registry.find("memtx").is_some());
        assert!(registry.find("vinyl").is_none());
    }
}
