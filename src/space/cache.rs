//! Registry of live spaces, ordered by space id

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::Space;

/// Live spaces keyed by id.
#[derive(Default)]
pub struct SpaceCache {
    spaces: RwLock<BTreeMap<u32, Arc<Space>>>,
}

impl SpaceCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a space, returning the one it replaced.
    pub fn insert(&self, space: Arc<Space>) -> Option<Arc<Space>> {
        self.spaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(space.id(), space)
    }

    /// Removes a space.
    pub fn remove(&self, id: u32) -> Option<Arc<Space>> {
        self.spaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    /// Finds a space by id.
    pub fn get(&self, id: u32) -> Option<Arc<Space>> {
        self.spaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Finds a space by its current name.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Space>> {
        self.spaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|space| space.name() == name)
            .cloned()
    }

    /// Number of live spaces.
    pub fn len(&self) -> usize {
        self.spaces.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if there are no spaces.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits every live space in id order.
    ///
    /// The set of spaces is fixed when the call starts; spaces created or
    /// dropped while visiting do not affect the iteration. The first error
    /// returned by `visit` stops the iteration and is returned.
    pub fn foreach<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&Arc<Space>) -> Result<(), E>,
    {
        let spaces: Vec<Arc<Space>> = self
            .spaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for space in &spaces {
            visit(space)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SpaceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceCache").field("len", &self.len()).finish()
    }
}
