//! readview - Consistent point-in-time read views over a multi-engine database
//!
//! A read view snapshots every engine and space of a `Catalog` at once, so a
//! long-running reader sees one consistent state while writers carry on.

pub mod catalog;
pub mod engine;
pub mod index;
pub mod observability;
pub mod read_view;
pub mod space;
pub mod tuple;
pub mod upgrade;

pub use catalog::Catalog;
pub use read_view::{ReadView, ReadViewError, ReadViewOptions, ReadViewResult};
