//! Observability for read views
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Counters
//!
//! Observability is passive: it never changes the outcome of an operation,
//! and a failure to write a log line is ignored.
//!
//! # Usage
//!
//! ```ignore
//! use readview::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::ReadViewClosed, &[("read_view", "...")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_opened();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_LEVEL_ENV};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else if event.is_routine() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
