//! ObservationScope for begin/complete logging around an operation
//!
//! - Logs the begin event on creation
//! - Logs the completion or failure event, with elapsed time, when finished
//! - Logs a warning on drop if the scope was never finished

use super::events::Event;
use super::logger::{Logger, Severity};

/// A scope that logs the begin and end of an operation.
///
/// # Usage
///
/// ```ignore
/// let scope = ObservationScope::begin(Event::ReadViewOpenBegin, vec![("read_view", id)]);
/// // ... do work ...
/// scope.complete(Event::ReadViewOpened, &[("spaces", "3")]);
/// ```
pub struct ObservationScope {
    begin: Event,
    fields: Vec<(&'static str, String)>,
    timer: Timer,
    finished: bool,
}

impl ObservationScope {
    /// Logs `begin` with `fields` and starts timing.
    ///
    /// `fields` are repeated on the completion or failure line.
    pub fn begin(begin: Event, fields: Vec<(&'static str, String)>) -> Self {
        let scope = Self {
            begin,
            fields,
            timer: Timer::new(),
            finished: false,
        };
        Logger::log(Severity::Info, begin.as_str(), &scope.field_refs());
        scope
    }

    /// Logs `event` at INFO with the scope fields, `extra` and `elapsed_ms`.
    pub fn complete(mut self, event: Event, extra: &[(&str, &str)]) {
        self.finished = true;
        self.finish(Severity::Info, event, extra);
    }

    /// Logs `event` at ERROR with the scope fields, `reason` and `elapsed_ms`.
    pub fn fail(mut self, event: Event, reason: &str) {
        self.finished = true;
        self.finish(Severity::Error, event, &[("reason", reason)]);
    }

    /// Whether the scope has been finished.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&self, severity: Severity, event: Event, extra: &[(&str, &str)]) {
        let elapsed = self.timer.elapsed_ms();
        let mut fields = self.field_refs();
        fields.extend(extra.iter().copied());
        fields.push(("elapsed_ms", elapsed.as_str()));
        Logger::log(severity, event.as_str(), &fields);
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                "OBSERVATION_SCOPE_INCOMPLETE",
                &[("begin", self.begin.as_str())],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
