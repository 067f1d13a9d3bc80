//! Space upgrades
//!
//! A space upgrade is a schema change applied lazily: stored tuples keep the
//! old layout and are converted when read. A read view opened while an
//! upgrade is in flight captures its own upgrade read view and runs every
//! result through it.
//!
//! An upgrade read view must be activated in the thread that will use it and
//! deactivated before it is handed to another one. Deactivating an inactive
//! upgrade read view is a no-op.

mod errors;
mod function;

pub use errors::{UpgradeError, UpgradeResult};
pub use function::{FunctionUpgrade, FunctionUpgradeReadView, UpgradeFn};

use crate::tuple::TupleRef;

/// Upgrade in flight on a live space.
pub trait SpaceUpgrade: Send + Sync {
    /// Upgrade name for diagnostics.
    fn name(&self) -> &str;

    /// Captures the upgrade for use by a read view.
    fn create_read_view(&self) -> UpgradeResult<Box<dyn UpgradeReadView>>;
}

/// Upgrade captured by a space read view.
pub trait UpgradeReadView: Send {
    /// Prepares the upgrade for use in the calling thread.
    fn activate(&mut self) -> UpgradeResult<()>;

    /// Releases per-thread state. Must be safe to call when inactive.
    fn deactivate(&mut self);

    /// Whether the upgrade is active.
    fn is_active(&self) -> bool;

    /// Converts a tuple to the new schema.
    ///
    /// Returns the input unchanged when no conversion is needed.
    fn apply(&self, tuple: TupleRef) -> UpgradeResult<TupleRef>;
}
