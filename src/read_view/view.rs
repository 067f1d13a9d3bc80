//! Database read view
//!
//! A `ReadView` owns one engine read view per engine that supports read
//! views and one space read view per included space. It is opened on any
//! thread, may be moved to another one, and is then activated by the thread
//! that reads from it. Only the active owner may look into its spaces and
//! indexes; only an inactive view may be closed.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use uuid::Uuid;

use super::errors::{ReadViewError, ReadViewResult};
use super::options::ReadViewOptions;
use super::shared::ViewState;
use super::space::SpaceReadView;
use crate::catalog::Catalog;
use crate::engine::EngineReadView;
use crate::observability::{log_event, Event, ObservationScope};

/// Consistent point-in-time view of the whole database.
pub struct ReadView {
    id: Uuid,
    // Spaces go before engines.
    spaces: Vec<SpaceReadView>,
    engines: Vec<Box<dyn EngineReadView>>,
    state: Arc<ViewState>,
    released: bool,
}

impl ReadView {
    /// Opens a read view of every engine and space in `catalog`.
    ///
    /// Engines without read view support are skipped together with their
    /// spaces. Temporary spaces are included only if `opts` asks for them.
    /// Either the whole view is built or nothing is: on error everything
    /// created so far is released before returning.
    ///
    /// Writes through the catalog's write gate wait while the view is being
    /// built, so every space and index is captured as of the same moment.
    /// The space filter must not write to the catalog's spaces.
    pub fn open(catalog: &Catalog, opts: &ReadViewOptions) -> ReadViewResult<Self> {
        let id = Uuid::new_v4();
        let scope = ObservationScope::begin(
            Event::ReadViewOpenBegin,
            vec![("read_view", id.to_string())],
        );

        let mut rv = Self {
            id,
            spaces: Vec::new(),
            engines: Vec::new(),
            state: Arc::new(ViewState::new(Arc::clone(catalog.metrics()))),
            released: false,
        };

        let frozen = catalog.write_gate().freeze();
        let populated = rv.populate(catalog, opts);
        drop(frozen);

        if let Err(err) = populated {
            rv.release();
            catalog.metrics().increment_open_failures();
            scope.fail(Event::ReadViewOpenFailed, &err.to_string());
            return Err(err);
        }

        let index_count: usize = rv.spaces.iter().map(SpaceReadView::index_count).sum();
        catalog.metrics().increment_opened();
        catalog
            .metrics()
            .add_snapshots(rv.spaces.len() as u64, index_count as u64);

        let engines = rv.engines.len().to_string();
        let spaces = rv.spaces.len().to_string();
        let indexes = index_count.to_string();
        scope.complete(
            Event::ReadViewOpened,
            &[
                ("engines", engines.as_str()),
                ("spaces", spaces.as_str()),
                ("indexes", indexes.as_str()),
            ],
        );
        Ok(rv)
    }

    fn populate(&mut self, catalog: &Catalog, opts: &ReadViewOptions) -> ReadViewResult<()> {
        for engine in catalog.engines().engines() {
            if !engine.supports_read_view() {
                continue;
            }
            let engine_rv =
                engine
                    .create_read_view(opts)
                    .map_err(|source| ReadViewError::Engine {
                        engine: engine.name().to_string(),
                        source,
                    })?;
            self.engines.push(engine_rv);
        }

        catalog.spaces().foreach(|space| {
            if !space.engine().supports_read_view() {
                return Ok(());
            }
            if space.is_temporary() && !opts.needs_temporary_spaces() {
                return Ok(());
            }
            if !opts.filter().filter_space(space) {
                return Ok(());
            }
            let space_rv = SpaceReadView::new(space, opts, catalog.formats(), &self.state)?;
            self.spaces.push(space_rv);
            Ok(())
        })
    }

    /// Closes the read view, releasing every space, index and engine view.
    ///
    /// The view must not be active.
    pub fn close(mut self) {
        debug_assert!(
            self.state.owner().is_none(),
            "read view closed while active"
        );
        self.finish();
    }

    /// Binds the read view to the calling thread and activates upgrades.
    ///
    /// The view must not be active. If any upgrade fails to activate, all
    /// upgrades are deactivated, the view is left inactive and the error is
    /// returned.
    pub fn activate(&mut self) -> ReadViewResult<()> {
        debug_assert!(
            self.state.owner().is_none(),
            "read view is already active"
        );
        self.state.set_owner(Some(thread::current().id()));

        let read_view = self.id.to_string();
        if let Err(err) = self
            .spaces
            .iter_mut()
            .try_for_each(SpaceReadView::activate_upgrade)
        {
            self.release_owner();
            self.state.metrics().increment_activation_failures();
            let reason = err.to_string();
            log_event(
                Event::ReadViewActivationFailed,
                &[("read_view", read_view.as_str()), ("reason", reason.as_str())],
            );
            return Err(err);
        }

        self.state.metrics().increment_activations();
        log_event(Event::ReadViewActivated, &[("read_view", read_view.as_str())]);
        Ok(())
    }

    /// Releases the read view from the calling thread.
    ///
    /// Must be called by the thread that activated it.
    pub fn deactivate(&mut self) {
        debug_assert!(
            self.state.is_owned_by_current(),
            "read view deactivated by a thread that does not own it"
        );
        self.release_owner();
        let read_view = self.id.to_string();
        log_event(Event::ReadViewDeactivated, &[("read_view", read_view.as_str())]);
    }

    fn release_owner(&mut self) {
        self.spaces
            .iter_mut()
            .for_each(SpaceReadView::deactivate_upgrade);
        self.state.set_owner(None);
    }

    fn release(&mut self) {
        self.spaces.clear();
        self.engines.clear();
        self.released = true;
    }

    fn finish(&mut self) {
        let spaces = self.spaces.len().to_string();
        self.release();
        self.state.metrics().increment_closed();

        let read_view = self.id.to_string();
        log_event(
            Event::ReadViewClosed,
            &[("read_view", read_view.as_str()), ("spaces", spaces.as_str())],
        );
    }

    /// Read view id, used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Thread the view is bound to, if active.
    pub fn owner(&self) -> Option<ThreadId> {
        self.state.owner()
    }

    /// Whether the view is bound to a thread.
    pub fn is_active(&self) -> bool {
        self.owner().is_some()
    }

    /// Space read views in space id order.
    pub fn spaces(&self) -> &[SpaceReadView] {
        &self.spaces
    }

    /// Space read view by space id.
    pub fn space(&self, id: u32) -> Option<&SpaceReadView> {
        self.spaces
            .binary_search_by_key(&id, SpaceReadView::id)
            .ok()
            .map(|pos| &self.spaces[pos])
    }

    /// Space read view by the name the space had when the view was opened.
    pub fn space_by_name(&self, name: &str) -> Option<&SpaceReadView> {
        self.spaces.iter().find(|space| space.name() == name)
    }

    /// Engine read views in engine registration order.
    pub fn engines(&self) -> &[Box<dyn EngineReadView>] {
        &self.engines
    }
}

impl Drop for ReadView {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if self.state.owner().is_some() {
            self.release_owner();
        }
        self.finish();
    }
}

impl fmt::Debug for ReadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadView")
            .field("id", &self.id)
            .field("owner", &self.state.owner())
            .field(
                "engines",
                &self
                    .engines
                    .iter()
                    .map(|engine| engine.engine_name())
                    .collect::<Vec<_>>(),
            )
            .field("spaces", &self.spaces)
            .finish()
    }
}
