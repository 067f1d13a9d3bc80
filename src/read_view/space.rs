//! Space read views
//!
//! A space read view freezes what a reader needs to interpret the space:
//! its name and group, a tuple format, the upgrade in flight (if any) and
//! one index read view per included index, stored by index id.

use std::fmt;
use std::sync::Arc;

use super::errors::{ReadViewError, ReadViewResult};
use super::options::ReadViewOptions;
use super::shared::ViewState;
use crate::engine::EngineResult;
use crate::index::{IndexKey, IndexReadView};
use crate::space::Space;
use crate::tuple::{FormatRegistry, TupleDictionary, TupleFormat, TupleRef};
use crate::upgrade::UpgradeReadView;

/// Read view of one index, owned by its space read view.
pub struct IndexReadViewHandle {
    space_id: u32,
    inner: Box<dyn IndexReadView>,
    state: Arc<ViewState>,
}

impl IndexReadViewHandle {
    /// Id of the space this index belongs to.
    pub fn space_id(&self) -> u32 {
        self.space_id
    }

    /// Index id.
    pub fn index_id(&self) -> u32 {
        self.inner.index_id()
    }

    /// Looks up a raw stored tuple.
    ///
    /// Results must go through `SpaceReadView::process_result` before being
    /// returned to a user. Only the thread that activated the read view may
    /// call this.
    pub fn get(&self, key: &IndexKey) -> EngineResult<Option<TupleRef>> {
        self.check_owner();
        self.inner.get(key)
    }

    /// Number of tuples in the view. Owner thread only.
    pub fn len(&self) -> usize {
        self.check_owner();
        self.inner.len()
    }

    /// Returns true if the view holds no tuples. Owner thread only.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All raw stored tuples in key order. Owner thread only.
    pub fn tuples(&self) -> Vec<TupleRef> {
        self.check_owner();
        self.inner.tuples()
    }

    #[inline]
    fn check_owner(&self) {
        debug_assert!(
            self.state.is_owned_by_current(),
            "index read view used outside the thread that activated it"
        );
    }
}

impl fmt::Debug for IndexReadViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexReadViewHandle")
            .field("space_id", &self.space_id)
            .field("index_id", &self.inner.index_id())
            .finish()
    }
}

/// Read view of one space.
pub struct SpaceReadView {
    // Field order is drop order: indexes, then upgrade, then format.
    index_map: Vec<Option<IndexReadViewHandle>>,
    upgrade: Option<Box<dyn UpgradeReadView>>,
    format: Arc<TupleFormat>,
    id: u32,
    name: String,
    group_id: u32,
    index_id_max: u32,
    state: Arc<ViewState>,
}

impl SpaceReadView {
    /// Builds the read view of `space`.
    ///
    /// On error everything built so far for this space is dropped.
    pub(crate) fn new(
        space: &Space,
        opts: &ReadViewOptions,
        formats: &FormatRegistry,
        state: &Arc<ViewState>,
    ) -> ReadViewResult<Self> {
        // One consistent copy of the definition; later renames and alters of
        // the live space do not reach this read view.
        let def = space.def();

        let format = if opts.needs_field_names() {
            let dictionary =
                TupleDictionary::new(&def.fields).map_err(|source| ReadViewError::Format {
                    space: def.name.clone(),
                    source,
                })?;
            formats
                .new_runtime_format(dictionary)
                .map_err(|source| ReadViewError::Format {
                    space: def.name.clone(),
                    source,
                })?
        } else {
            formats.runtime_format()
        };

        let upgrade = match space.upgrade() {
            Some(upgrade) if opts.needs_space_upgrade() => {
                Some(upgrade.create_read_view().map_err(|source| {
                    ReadViewError::UpgradeCapture {
                        space: def.name.clone(),
                        source,
                    }
                })?)
            }
            _ => None,
        };

        let indexes = space.indexes();
        let mut index_map = Vec::new();
        index_map
            .try_reserve_exact(indexes.len())
            .map_err(|_| ReadViewError::OutOfMemory {
                space: def.name.clone(),
                what: "index map",
            })?;
        index_map.resize_with(indexes.len(), || None);

        let mut space_rv = Self {
            index_map,
            upgrade,
            format,
            id: space.id(),
            name: def.name,
            group_id: def.group_id,
            index_id_max: indexes.len().saturating_sub(1) as u32,
            state: Arc::clone(state),
        };

        for (id, index) in indexes.iter().enumerate() {
            let Some(index) = index else { continue };
            if !opts.filter().filter_index(space, &**index) {
                continue;
            }
            let inner = index
                .create_read_view()
                .map_err(|source| ReadViewError::Index {
                    space: space_rv.name.clone(),
                    index_id: id as u32,
                    source,
                })?;
            space_rv.index_map[id] = Some(IndexReadViewHandle {
                space_id: space_rv.id,
                inner,
                state: Arc::clone(state),
            });
        }

        Ok(space_rv)
    }

    /// Space id.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Space name as of read view creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replication group id.
    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    /// Tuple format for decoding results.
    pub fn format(&self) -> &Arc<TupleFormat> {
        &self.format
    }

    /// Whether an upgrade was captured.
    pub fn has_upgrade(&self) -> bool {
        self.upgrade.is_some()
    }

    /// Whether the captured upgrade, if any, is active.
    pub fn is_upgrade_active(&self) -> bool {
        self.upgrade.as_ref().is_some_and(|u| u.is_active())
    }

    /// Highest index id considered.
    pub fn index_id_max(&self) -> u32 {
        self.index_id_max
    }

    /// Index slots by id; `index_id_max() + 1` entries.
    pub fn index_map(&self) -> &[Option<IndexReadViewHandle>] {
        &self.index_map
    }

    /// Index read view by id; `None` past `index_id_max` or if not included.
    pub fn index(&self, id: u32) -> Option<&IndexReadViewHandle> {
        self.index_map.get(id as usize)?.as_ref()
    }

    /// Number of index read views.
    pub fn index_count(&self) -> usize {
        self.index_map.iter().flatten().count()
    }

    /// Prepares a tuple read from this space to be returned to the user.
    ///
    /// Applies the captured upgrade, which may produce a new tuple. Without
    /// an upgrade the same tuple is returned. Only the thread that activated
    /// the read view may call this.
    pub fn process_result(&self, tuple: TupleRef) -> ReadViewResult<TupleRef> {
        debug_assert!(
            self.state.is_owned_by_current(),
            "space read view used outside the thread that activated it"
        );
        let Some(upgrade) = self.upgrade.as_ref() else {
            return Ok(tuple);
        };
        let input = Arc::clone(&tuple);
        let output = upgrade
            .apply(tuple)
            .map_err(|source| ReadViewError::Upgrade {
                space: self.name.clone(),
                source,
            })?;
        if !Arc::ptr_eq(&input, &output) {
            self.state.metrics().increment_results_upgraded();
        }
        Ok(output)
    }

    /// Looks up a tuple by key and prepares it for the user.
    ///
    /// Owner thread only.
    pub fn get(&self, index_id: u32, key: &IndexKey) -> ReadViewResult<Option<TupleRef>> {
        let index = self.index(index_id).ok_or_else(|| ReadViewError::NoSuchIndex {
            space: self.name.clone(),
            index_id,
        })?;
        let found = index.get(key).map_err(|source| ReadViewError::Read {
            space: self.name.clone(),
            index_id,
            source,
        })?;
        found.map(|tuple| self.process_result(tuple)).transpose()
    }

    pub(crate) fn activate_upgrade(&mut self) -> ReadViewResult<()> {
        let Some(upgrade) = self.upgrade.as_mut() else {
            return Ok(());
        };
        upgrade.activate().map_err(|source| ReadViewError::Activation {
            space: self.name.clone(),
            source,
        })
    }

    pub(crate) fn deactivate_upgrade(&mut self) {
        if let Some(upgrade) = self.upgrade.as_mut() {
            upgrade.deactivate();
        }
    }
}

impl fmt::Debug for SpaceReadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceReadView")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("group_id", &self.group_id)
            .field("format", &self.format.id())
            .field("upgrade", &self.upgrade.is_some())
            .field("index_map", &self.index_map)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use crate::index::TreeIndex;
    use crate::observability::MetricsRegistry;
    use crate::read_view::ClosureFilter;
    use crate::space::SpaceDef;
    use crate::tuple::{FieldDef, FieldType, Tuple};
    use crate::upgrade::FunctionUpgrade;
    use serde_json::json;
    use std::thread;

    fn state() -> Arc<ViewState> {
        Arc::new(ViewState::new(Arc::new(MetricsRegistry::new())))
    }

    fn space() -> Space {
        let def = SpaceDef::new("users")
            .with_group_id(1)
            .with_fields(vec![
                FieldDef::new("id", FieldType::Unsigned),
                FieldDef::new("name", FieldType::String),
            ]);
        let space = Space::new(512, def, Arc::new(MemoryEngine::new("memtx")));
        space.set_index(Arc::new(TreeIndex::new(0, "pk", 0)));
        space.set_index(Arc::new(TreeIndex::new(2, "name", 1)));
        space
            .replace(Tuple::new(vec![json!(1), json!("alice")]))
            .unwrap();
        space
    }

    #[test]
    fn test_sparse_index_map() {
        let space = space();
        let formats = FormatRegistry::new();
        let rv = SpaceReadView::new(&space, &ReadViewOptions::new(), &formats, &state()).unwrap();

        assert_eq!(rv.id(), 512);
        assert_eq!(rv.name(), "users");
        assert_eq!(rv.group_id(), 1);
        assert_eq!(rv.index_id_max(), 2);
        assert_eq!(rv.index_map().len(), 3);
        assert!(rv.index(0).is_some());
        assert!(rv.index(1).is_none());
        assert!(rv.index(2).is_some());
        assert!(rv.index(3).is_none());
        assert!(rv.index_map().iter().flatten().all(|i| i.space_id() == 512));
    }

    #[test]
    fn test_filtered_index_slot_is_empty() {
        let space = space();
        let opts = ReadViewOptions::new()
            .with_filter(ClosureFilter::new().indexes(|_, index| index.id() != 2));
        let rv = SpaceReadView::new(&space, &opts, &FormatRegistry::new(), &state()).unwrap();
        assert_eq!(rv.index_map().len(), 3);
        assert_eq!(rv.index_count(), 1);
    }

    #[test]
    fn test_space_without_indexes() {
        let space = Space::new(7, SpaceDef::new("bare"), Arc::new(MemoryEngine::new("memtx")));
        let opts = ReadViewOptions::new();
        let rv = SpaceReadView::new(&space, &opts, &FormatRegistry::new(), &state()).unwrap();
        assert_eq!(rv.index_id_max(), 0);
        assert_eq!(rv.index_map().len(), 1);
        assert_eq!(rv.index_count(), 0);
        assert!(rv.index(0).is_none());
    }

    #[test]
    fn test_name_is_copied() {
        let space = space();
        let opts = ReadViewOptions::new();
        let rv = SpaceReadView::new(&space, &opts, &FormatRegistry::new(), &state()).unwrap();
        space.rename("renamed");
        assert_eq!(rv.name(), "users");
    }

    #[test]
    fn test_format_limit_fails_construction() {
        let space = space();
        let formats = FormatRegistry::with_limit(1);
        let opts = ReadViewOptions::new().with_field_names(true);
        let err = SpaceReadView::new(&space, &opts, &formats, &state()).unwrap_err();
        assert_eq!(err.code(), "RV_FORMAT_LIMIT_REACHED");
        assert_eq!(formats.live_formats(), 1);
    }

    #[test]
    fn test_get_applies_upgrade() {
        let space = space();
        space.set_upgrade(Some(Arc::new(FunctionUpgrade::new("upper", |t: &Tuple| {
            let name = t.field(1).and_then(|v| v.as_str()).unwrap_or_default();
            let id = t.field(0).cloned().unwrap_or_default();
            Ok(Some(Tuple::new(vec![id, json!(name.to_uppercase())])))
        }))));
        let state = state();
        let opts = ReadViewOptions::new().with_space_upgrade(true);
        let mut rv = SpaceReadView::new(&space, &opts, &FormatRegistry::new(), &state).unwrap();
        assert!(rv.has_upgrade());

        state.set_owner(Some(thread::current().id()));
        rv.activate_upgrade().unwrap();
        let tuple = rv.get(0, &IndexKey::from_int(1)).unwrap().unwrap();
        assert_eq!(tuple.field(1), Some(&json!("ALICE")));
        assert!(rv.get(0, &IndexKey::from_int(9)).unwrap().is_none());
        assert_eq!(rv.get(1, &IndexKey::from_int(1)).unwrap_err().code(), "RV_NO_SUCH_INDEX");

        rv.deactivate_upgrade();
        state.set_owner(None);
        assert!(!rv.is_upgrade_active());
    }
}
