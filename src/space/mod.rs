//! Spaces
//!
//! A space is a table-like container of tuples hosted by one engine. Its
//! definition (name, fields, flags), its index map and its in-flight upgrade
//! may all change while read views are being built, so every accessor hands
//! out an owned copy taken under a read lock.
//!
//! Every change to a space passes through its `WriteGate`. Spaces created by
//! a `Catalog` share the catalog's gate, which a read view closes while it is
//! being opened, so the view sees every space as of one moment.

mod cache;

pub use cache::SpaceCache;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, EngineError, EngineResult};
use crate::index::{Index, IndexKey};
use crate::tuple::{FieldDef, Tuple, TupleRef};
use crate::upgrade::SpaceUpgrade;

/// Mutable part of a space definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDef {
    /// Space name
    pub name: String,
    /// Replication group id
    #[serde(default)]
    pub group_id: u32,
    /// Temporary spaces are excluded from read views by default
    #[serde(default)]
    pub is_temporary: bool,
    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl SpaceDef {
    /// Creates a definition with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_id: 0,
            is_temporary: false,
            fields: Vec::new(),
        }
    }

    /// Sets the field definitions.
    pub fn with_fields(mut self, fields: Vec<FieldDef>) -> Self {
        self.fields = fields;
        self
    }

    /// Marks the space temporary.
    pub fn temporary(mut self) -> Self {
        self.is_temporary = true;
        self
    }

    /// Sets the replication group id.
    pub fn with_group_id(mut self, group_id: u32) -> Self {
        self.group_id = group_id;
        self
    }
}

/// Orders writers against read view creation.
///
/// Writers enter the gate shared and run concurrently with each other.
/// Opening a read view freezes the gate, waiting for writers in progress
/// and holding new ones back until the view is built.
#[derive(Debug, Default)]
pub struct WriteGate {
    lock: RwLock<()>,
}

impl WriteGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits one writer.
    pub fn enter(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Holds all writers back while the guard lives.
    ///
    /// Must not be called by a thread that is inside the gate.
    pub fn freeze(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A live space.
pub struct Space {
    id: u32,
    engine: Arc<dyn Engine>,
    gate: Arc<WriteGate>,
    def: RwLock<SpaceDef>,
    indexes: RwLock<Vec<Option<Arc<dyn Index>>>>,
    upgrade: RwLock<Option<Arc<dyn SpaceUpgrade>>>,
    dml: Mutex<()>,
}

impl Space {
    /// Creates a space with no indexes and a gate of its own.
    pub fn new(id: u32, def: SpaceDef, engine: Arc<dyn Engine>) -> Self {
        Self::with_write_gate(id, def, engine, Arc::new(WriteGate::new()))
    }

    /// Creates a space with no indexes whose writes pass through `gate`.
    pub fn with_write_gate(
        id: u32,
        def: SpaceDef,
        engine: Arc<dyn Engine>,
        gate: Arc<WriteGate>,
    ) -> Self {
        Self {
            id,
            engine,
            gate,
            def: RwLock::new(def),
            indexes: RwLock::new(Vec::new()),
            upgrade: RwLock::new(None),
            dml: Mutex::new(()),
        }
    }

    /// Space id.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Engine hosting this space.
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Gate every change to this space passes through.
    pub fn write_gate(&self) -> &Arc<WriteGate> {
        &self.gate
    }

    /// Copy of the current definition.
    pub fn def(&self) -> SpaceDef {
        self.def.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current name.
    pub fn name(&self) -> String {
        self.def.read().unwrap_or_else(PoisonError::into_inner).name.clone()
    }

    /// Replication group id.
    pub fn group_id(&self) -> u32 {
        self.def.read().unwrap_or_else(PoisonError::into_inner).group_id
    }

    /// Whether the space is temporary.
    pub fn is_temporary(&self) -> bool {
        self.def.read().unwrap_or_else(PoisonError::into_inner).is_temporary
    }

    /// Copy of the current field definitions.
    pub fn fields(&self) -> Vec<FieldDef> {
        self.def.read().unwrap_or_else(PoisonError::into_inner).fields.clone()
    }

    /// Upgrade in flight, if any.
    pub fn upgrade(&self) -> Option<Arc<dyn SpaceUpgrade>> {
        self.upgrade.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Copy of the index map, indexed by index id.
    ///
    /// Never empty: a space without indexes yields one vacant slot, so the
    /// copy always holds `index_id_max() + 1` slots.
    pub fn indexes(&self) -> Vec<Option<Arc<dyn Index>>> {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        if indexes.is_empty() {
            vec![None]
        } else {
            indexes.clone()
        }
    }

    /// Highest index id.
    pub fn index_id_max(&self) -> u32 {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        indexes.len().saturating_sub(1) as u32
    }

    /// Index with the given id.
    pub fn index(&self, id: u32) -> Option<Arc<dyn Index>> {
        self.indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id as usize)
            .cloned()
            .flatten()
    }

    /// Renames the space.
    pub fn rename(&self, name: impl Into<String>) {
        let _gate = self.gate.enter();
        self.def.write().unwrap_or_else(PoisonError::into_inner).name = name.into();
    }

    /// Replaces the field definitions.
    pub fn alter_fields(&self, fields: Vec<FieldDef>) {
        let _gate = self.gate.enter();
        self.def.write().unwrap_or_else(PoisonError::into_inner).fields = fields;
    }

    /// Starts or finishes an upgrade.
    pub fn set_upgrade(&self, upgrade: Option<Arc<dyn SpaceUpgrade>>) {
        let _gate = self.gate.enter();
        *self.upgrade.write().unwrap_or_else(PoisonError::into_inner) = upgrade;
    }

    /// Installs an index at its id, replacing any previous one.
    pub fn set_index(&self, index: Arc<dyn Index>) {
        let _gate = self.gate.enter();
        let mut indexes = self.indexes.write().unwrap_or_else(PoisonError::into_inner);
        let id = index.id() as usize;
        if indexes.len() <= id {
            indexes.resize_with(id + 1, || None);
        }
        indexes[id] = Some(index);
    }

    /// Drops the index with the given id.
    pub fn drop_index(&self, id: u32) -> Option<Arc<dyn Index>> {
        let _gate = self.gate.enter();
        let mut indexes = self.indexes.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = indexes.get_mut(id as usize).and_then(Option::take);
        while matches!(indexes.last(), Some(None)) {
            indexes.pop();
        }
        dropped
    }

    /// Inserts or replaces a tuple by primary key.
    ///
    /// Returns the tuple it replaced.
    pub fn replace(&self, tuple: Tuple) -> EngineResult<Option<TupleRef>> {
        let _gate = self.gate.enter();
        let _dml = self.dml.lock().unwrap_or_else(PoisonError::into_inner);
        let indexes = self.indexes();
        let primary = self.primary(&indexes)?;

        let new = Arc::new(tuple);
        let old = primary.get(&primary.key_of(&new)?)?;

        for index in indexes.iter().skip(1).flatten() {
            if let Some(existing) = index.get(&index.key_of(&new)?)? {
                let same_row = old.as_ref().is_some_and(|old| Arc::ptr_eq(old, &existing));
                if !same_row {
                    return Err(EngineError::DuplicateKey {
                        index: index.name().to_string(),
                    });
                }
            }
        }
        for index in indexes.iter().flatten() {
            index.replace(old.as_ref(), Some(Arc::clone(&new)))?;
        }
        Ok(old)
    }

    /// Deletes a tuple by primary key.
    pub fn delete(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>> {
        let _gate = self.gate.enter();
        let _dml = self.dml.lock().unwrap_or_else(PoisonError::into_inner);
        let indexes = self.indexes();
        let primary = self.primary(&indexes)?;

        let Some(old) = primary.get(key)? else {
            return Ok(None);
        };
        for index in indexes.iter().flatten() {
            index.replace(Some(&old), None)?;
        }
        Ok(Some(old))
    }

    /// Looks up a tuple by primary key.
    pub fn get(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>> {
        let indexes = self.indexes();
        self.primary(&indexes)?.get(key)
    }

    fn primary<'a>(
        &self,
        indexes: &'a [Option<Arc<dyn Index>>],
    ) -> EngineResult<&'a Arc<dyn Index>> {
        indexes
            .first()
            .and_then(Option::as_ref)
            .ok_or(EngineError::NoPrimaryIndex(self.id))
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("id", &self.id)
            .field("engine", &self.engine.name())
            .field("def", &self.def())
            .field("index_id_max", &self.index_id_max())
            .finish()
    }
}
