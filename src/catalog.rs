//! Database catalog
//!
//! The catalog is everything a read view is taken of: registered engines,
//! live spaces, the tuple format registry and the read view counters.

use std::fmt;
use std::sync::Arc;

use crate::engine::{Engine, EngineError, EngineRegistry, EngineResult};
use crate::observability::MetricsRegistry;
use crate::read_view::{ReadView, ReadViewOptions, ReadViewResult};
use crate::space::{Space, SpaceCache, SpaceDef, WriteGate};
use crate::tuple::FormatRegistry;

/// Engines, spaces and formats of one database.
#[derive(Default)]
pub struct Catalog {
    engines: EngineRegistry,
    spaces: SpaceCache,
    formats: FormatRegistry,
    metrics: Arc<MetricsRegistry>,
    write_gate: Arc<WriteGate>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog using `formats` for tuple formats.
    pub fn with_formats(formats: FormatRegistry) -> Self {
        Self {
            formats,
            ..Self::default()
        }
    }

    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    pub fn spaces(&self) -> &SpaceCache {
        &self.spaces
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Gate shared by every space this catalog creates.
    pub fn write_gate(&self) -> &Arc<WriteGate> {
        &self.write_gate
    }

    /// Registers an engine. Engine names are unique.
    pub fn register_engine(&self, engine: Arc<dyn Engine>) -> EngineResult<()> {
        self.engines.register(engine)
    }

    /// Creates a space hosted by the named engine.
    ///
    /// A space already registered under `id` is replaced. Writes to the new
    /// space pass through the catalog's write gate.
    pub fn create_space(
        &self,
        id: u32,
        def: SpaceDef,
        engine: &str,
    ) -> EngineResult<Arc<Space>> {
        let engine = self
            .engines
            .find(engine)
            .ok_or_else(|| EngineError::UnknownEngine(engine.to_string()))?;
        let _gate = self.write_gate.enter();
        let space = Arc::new(Space::with_write_gate(
            id,
            def,
            engine,
            Arc::clone(&self.write_gate),
        ));
        self.spaces.insert(Arc::clone(&space));
        Ok(space)
    }

    /// Drops a space.
    pub fn drop_space(&self, id: u32) -> Option<Arc<Space>> {
        let _gate = self.write_gate.enter();
        self.spaces.remove(id)
    }

    /// Opens a read view of this catalog.
    pub fn open_read_view(&self, opts: &ReadViewOptions) -> ReadViewResult<ReadView> {
        ReadView::open(self, opts)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("engines", &self.engines)
            .field("spaces", &self.spaces)
            .field("live_formats", &self.formats.live_formats())
            .finish()
    }
}
