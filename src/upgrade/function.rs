//! Closure-backed space upgrade

use std::fmt;
use std::sync::Arc;

use super::errors::{UpgradeError, UpgradeResult};
use super::{SpaceUpgrade, UpgradeReadView};
use crate::tuple::{Tuple, TupleRef};

/// Tuple conversion function.
///
/// Returns `Ok(None)` when the tuple already has the new layout.
pub type UpgradeFn = Arc<dyn Fn(&Tuple) -> Result<Option<Tuple>, String> + Send + Sync>;

/// Space upgrade driven by a conversion function.
#[derive(Clone)]
pub struct FunctionUpgrade {
    name: String,
    func: UpgradeFn,
}

impl FunctionUpgrade {
    /// Creates an upgrade from a conversion function.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Tuple) -> Result<Option<Tuple>, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl SpaceUpgrade for FunctionUpgrade {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_read_view(&self) -> UpgradeResult<Box<dyn UpgradeReadView>> {
        Ok(Box::new(FunctionUpgradeReadView {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
            active: false,
        }))
    }
}

impl fmt::Debug for FunctionUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionUpgrade").field("name", &self.name).finish()
    }
}

/// Read view of a `FunctionUpgrade`.
pub struct FunctionUpgradeReadView {
    name: String,
    func: UpgradeFn,
    active: bool,
}

impl UpgradeReadView for FunctionUpgradeReadView {
    fn activate(&mut self) -> UpgradeResult<()> {
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn apply(&self, tuple: TupleRef) -> UpgradeResult<TupleRef> {
        if !self.active {
            return Err(UpgradeError::Inactive(self.name.clone()));
        }
        match (self.func)(&tuple) {
            Ok(Some(converted)) => Ok(Arc::new(converted)),
            Ok(None) => Ok(tuple),
            Err(reason) => Err(UpgradeError::Transform(self.name.clone(), reason)),
        }
    }
}

impl fmt::Debug for FunctionUpgradeReadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionUpgradeReadView")
            .field("name", &self.name)
            .field("active", &self.active)
            .finish()
    }
}
