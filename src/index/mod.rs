//! Indexes
//!
//! An index is a lookup structure over the tuples of one space. Index ids are
//! small integers, dense per space; id 0 is the primary index.
//!
//! # Read views
//!
//! An index read view is a frozen copy of the index as of its creation. It is
//! owned by the space read view that requested it and destroyed by dropping
//! it. The read view core never looks inside.

mod tree;

pub use tree::{IndexKey, TreeIndex, TreeIndexReadView};

use crate::engine::EngineResult;
use crate::tuple::{Tuple, TupleRef};

/// Live index of a space.
pub trait Index: Send + Sync {
    /// Index id within its space.
    fn id(&self) -> u32;

    /// Index name.
    fn name(&self) -> &str;

    /// Extracts this index's key from a tuple.
    fn key_of(&self, tuple: &Tuple) -> EngineResult<IndexKey>;

    /// Looks up a tuple by key.
    fn get(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>>;

    /// Removes `old` (if given) and inserts `new` (if given).
    ///
    /// Returns the tuple displaced by `new`, if any.
    fn replace(
        &self,
        old: Option<&TupleRef>,
        new: Option<TupleRef>,
    ) -> EngineResult<Option<TupleRef>>;

    /// Number of tuples in the index.
    fn len(&self) -> usize;

    /// Returns true if the index holds no tuples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a frozen read view of this index.
    fn create_read_view(&self) -> EngineResult<Box<dyn IndexReadView>>;
}

/// Frozen view of an index.
pub trait IndexReadView: Send {
    /// Id of the index this view was created from.
    fn index_id(&self) -> u32;

    /// Looks up a tuple by key.
    fn get(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>>;

    /// Number of tuples visible in this view.
    fn len(&self) -> usize;

    /// Returns true if no tuples are visible in this view.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All visible tuples in key order.
    fn tuples(&self) -> Vec<TupleRef>;
}
