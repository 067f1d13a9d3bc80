//! BTreeMap-based unique index
//!
//! The tree is kept behind an `Arc`. A read view clones the `Arc`; the next
//! write after that clones the tree (`Arc::make_mut`), leaving the read view
//! with the old, unchanged copy.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use super::{Index, IndexReadView};
use crate::engine::{EngineError, EngineResult};
use crate::tuple::{Tuple, TupleRef};

/// Index key representing a single field value.
///
/// Ordering is deterministic: Bool < Int < Float < String.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (stored as bits for total ordering)
    Float(u64),
    /// String value
    String(String),
}

impl IndexKey {
    /// Create a key from an integer
    pub fn from_int(v: i64) -> Self {
        IndexKey::Int(v)
    }

    /// Create a key from a float
    ///
    /// Uses bit representation for total ordering.
    pub fn from_float(v: f64) -> Self {
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        IndexKey::Float(ordered)
    }

    /// Create a key from a string
    pub fn from_string(v: impl Into<String>) -> Self {
        IndexKey::String(v.into())
    }

    /// Create a key from a JSON value
    ///
    /// Arrays, maps and null are not indexable.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(IndexKey::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(IndexKey::from_int(i))
                } else {
                    n.as_f64().map(IndexKey::from_float)
                }
            }
            Value::String(s) => Some(IndexKey::from_string(s.as_str())),
            _ => None,
        }
    }
}

impl From<i64> for IndexKey {
    fn from(v: i64) -> Self {
        IndexKey::Int(v)
    }
}

impl From<&str> for IndexKey {
    fn from(v: &str) -> Self {
        IndexKey::String(v.to_string())
    }
}

type Tree = BTreeMap<IndexKey, TupleRef>;

/// Unique single-field index.
pub struct TreeIndex {
    id: u32,
    name: String,
    key_field: u32,
    tree: RwLock<Arc<Tree>>,
}

impl TreeIndex {
    /// Creates an empty index keyed by the tuple field at `key_field`.
    pub fn new(id: u32, name: impl Into<String>, key_field: u32) -> Self {
        Self {
            id,
            name: name.into(),
            key_field,
            tree: RwLock::new(Arc::new(BTreeMap::new())),
        }
    }

    /// Position of the key field.
    pub fn key_field(&self) -> u32 {
        self.key_field
    }

    fn current(&self) -> Arc<Tree> {
        Arc::clone(&self.tree.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Index for TreeIndex {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn key_of(&self, tuple: &Tuple) -> EngineResult<IndexKey> {
        tuple
            .field(self.key_field as usize)
            .and_then(IndexKey::from_json)
            .ok_or(EngineError::InvalidKey {
                field: self.key_field,
            })
    }

    fn get(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>> {
        Ok(self.current().get(key).cloned())
    }

    fn replace(
        &self,
        old: Option<&TupleRef>,
        new: Option<TupleRef>,
    ) -> EngineResult<Option<TupleRef>> {
        let old_key = old.map(|t| self.key_of(t)).transpose()?;
        let new_key = new.as_ref().map(|t| self.key_of(t)).transpose()?;

        let mut guard = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let tree = Arc::make_mut(&mut *guard);

        if let Some(key) = old_key {
            tree.remove(&key);
        }
        match (new_key, new) {
            (Some(key), Some(tuple)) => Ok(tree.insert(key, tuple)),
            _ => Ok(None),
        }
    }

    fn len(&self) -> usize {
        self.current().len()
    }

    fn create_read_view(&self) -> EngineResult<Box<dyn IndexReadView>> {
        Ok(Box::new(TreeIndexReadView {
            index_id: self.id,
            tree: self.current(),
        }))
    }
}

impl fmt::Debug for TreeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeIndex")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key_field", &self.key_field)
            .field("len", &self.len())
            .finish()
    }
}

/// Frozen view of a `TreeIndex`.
#[derive(Debug)]
pub struct TreeIndexReadView {
    index_id: u32,
    tree: Arc<Tree>,
}

impl IndexReadView for TreeIndexReadView {
    fn index_id(&self) -> u32 {
        self.index_id
    }

    fn get(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>> {
        Ok(self.tree.get(key).cloned())
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn tuples(&self) -> Vec<TupleRef> {
        self.tree.values().cloned().collect()
    }
}
