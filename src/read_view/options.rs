//! Read view creation options

use std::fmt;
use std::sync::Arc;

use crate::index::Index;
use crate::space::Space;

/// Decides which spaces and indexes go into a read view.
///
/// Both methods accept everything by default. Any state a filter needs is
/// kept in the implementing type.
pub trait ReadViewFilter: Send + Sync {
    /// Returns true if `space` should be included.
    fn filter_space(&self, space: &Space) -> bool {
        let _ = space;
        true
    }

    /// Returns true if `index` of `space` should be included.
    fn filter_index(&self, space: &Space, index: &dyn Index) -> bool {
        let _ = (space, index);
        true
    }
}

/// Filter that includes every space and index.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ReadViewFilter for AcceptAll {}

type SpacePredicate = Box<dyn Fn(&Space) -> bool + Send + Sync>;
type IndexPredicate = Box<dyn Fn(&Space, &dyn Index) -> bool + Send + Sync>;

/// Filter built from closures.
///
/// ```ignore
/// let filter = ClosureFilter::new()
///     .spaces(|space| space.id() >= 512)
///     .indexes(|_, index| index.id() == 0);
/// ```
#[derive(Default)]
pub struct ClosureFilter {
    space: Option<SpacePredicate>,
    index: Option<IndexPredicate>,
}

impl ClosureFilter {
    /// Creates a filter that includes everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the space predicate.
    pub fn spaces<F>(mut self, f: F) -> Self
    where
        F: Fn(&Space) -> bool + Send + Sync + 'static,
    {
        self.space = Some(Box::new(f));
        self
    }

    /// Sets the index predicate.
    pub fn indexes<F>(mut self, f: F) -> Self
    where
        F: Fn(&Space, &dyn Index) -> bool + Send + Sync + 'static,
    {
        self.index = Some(Box::new(f));
        self
    }
}

impl ReadViewFilter for ClosureFilter {
    fn filter_space(&self, space: &Space) -> bool {
        self.space.as_ref().map_or(true, |f| f(space))
    }

    fn filter_index(&self, space: &Space, index: &dyn Index) -> bool {
        self.index.as_ref().map_or(true, |f| f(space, index))
    }
}

/// Options controlling what a read view includes.
///
/// Immutable once built; the builder methods return a modified copy.
#[derive(Clone)]
pub struct ReadViewOptions {
    filter: Arc<dyn ReadViewFilter>,
    needs_field_names: bool,
    needs_space_upgrade: bool,
    needs_temporary_spaces: bool,
}

impl ReadViewOptions {
    /// Default options: every space and index, shared nameless format,
    /// no upgrades, no temporary spaces.
    pub fn new() -> Self {
        Self {
            filter: Arc::new(AcceptAll),
            needs_field_names: false,
            needs_space_upgrade: false,
            needs_temporary_spaces: false,
        }
    }

    /// Sets the space and index filter.
    pub fn with_filter(mut self, filter: impl ReadViewFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Build a named tuple format for each space.
    pub fn with_field_names(mut self, yes: bool) -> Self {
        self.needs_field_names = yes;
        self
    }

    /// Capture space upgrades in flight.
    pub fn with_space_upgrade(mut self, yes: bool) -> Self {
        self.needs_space_upgrade = yes;
        self
    }

    /// Include temporary spaces.
    pub fn with_temporary_spaces(mut self, yes: bool) -> Self {
        self.needs_temporary_spaces = yes;
        self
    }

    /// The space and index filter.
    pub fn filter(&self) -> &dyn ReadViewFilter {
        self.filter.as_ref()
    }

    /// Whether a named format is built for each space.
    pub fn needs_field_names(&self) -> bool {
        self.needs_field_names
    }

    /// Whether upgrades in flight are captured.
    pub fn needs_space_upgrade(&self) -> bool {
        self.needs_space_upgrade
    }

    /// Whether temporary spaces are included.
    pub fn needs_temporary_spaces(&self) -> bool {
        self.needs_temporary_spaces
    }
}

impl Default for ReadViewOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReadViewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadViewOptions")
            .field("needs_field_names", &self.needs_field_names)
            .field("needs_space_upgrade", &self.needs_space_upgrade)
            .field("needs_temporary_spaces", &self.needs_temporary_spaces)
            .finish_non_exhaustive()
    }
}
