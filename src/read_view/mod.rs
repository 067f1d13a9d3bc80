//! Consistent read views
//!
//! A read view is a point-in-time snapshot of every engine and space in a
//! `Catalog`. It is built in one pass:
//!
//! 1. one engine read view per engine that supports read views
//! 2. one space read view per included space, each holding a tuple format,
//!    an optional upgrade read view and one read view per included index
//!
//! Construction is all-or-nothing. Once built, a read view is never
//! resized; it is released as a whole by `ReadView::close` or by drop.
//!
//! # Thread affinity
//!
//! Space and index read views may only be used by the thread that
//! activated the read view. Activation also activates every captured space
//! upgrade, so results read through `SpaceReadView::process_result` come
//! out in the current space format. Violations are programming errors and
//! are caught by debug assertions.
//!
//! ```ignore
//! let mut rv = ReadView::open(&catalog, &ReadViewOptions::new())?;
//! std::thread::spawn(move || {
//!     rv.activate()?;
//!     let users = rv.space_by_name("users").unwrap();
//!     let tuple = users.get(0, &IndexKey::from_int(1))?;
//!     rv.deactivate();
//!     rv.close();
//!     Ok::<_, ReadViewError>(())
//! });
//! ```

mod config;
mod errors;
mod options;
mod shared;
mod space;
mod view;

pub use config::{ReadViewConfig, SpaceNameFilter};
pub use errors::{ConfigError, ConfigResult, ReadViewError, ReadViewResult};
pub use options::{AcceptAll, ClosureFilter, ReadViewFilter, ReadViewOptions};
pub use space::{IndexReadViewHandle, SpaceReadView};
pub use view::ReadView;
