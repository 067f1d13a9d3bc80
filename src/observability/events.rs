//! Observable read view lifecycle events

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Read view construction started
    ReadViewOpenBegin,
    /// Read view constructed
    ReadViewOpened,
    /// Read view construction failed and was unwound
    ReadViewOpenFailed,
    /// Read view destroyed
    ReadViewClosed,
    /// Read view bound to a thread
    ReadViewActivated,
    /// Read view activation failed and was rolled back
    ReadViewActivationFailed,
    /// Read view released by its thread
    ReadViewDeactivated,
    /// Read view configuration loaded
    ReadViewConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ReadViewOpenBegin => "READ_VIEW_OPEN_BEGIN",
            Event::ReadViewOpened => "READ_VIEW_OPENED",
            Event::ReadViewOpenFailed => "READ_VIEW_OPEN_FAILED",
            Event::ReadViewClosed => "READ_VIEW_CLOSED",
            Event::ReadViewActivated => "READ_VIEW_ACTIVATED",
            Event::ReadViewActivationFailed => "READ_VIEW_ACTIVATION_FAILED",
            Event::ReadViewDeactivated => "READ_VIEW_DEACTIVATED",
            Event::ReadViewConfigLoaded => "READ_VIEW_CONFIG_LOADED",
        }
    }

    /// Returns true if the event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::ReadViewOpenFailed | Event::ReadViewActivationFailed
        )
    }

    /// Returns true if the event is routine and logged at TRACE level
    pub fn is_routine(&self) -> bool {
        matches!(self, Event::ReadViewActivated | Event::ReadViewDeactivated)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::ReadViewOpened.as_str(), "READ_VIEW_OPENED");
        assert_eq!(Event::ReadViewClosed.to_string(), "READ_VIEW_CLOSED");
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::ReadViewOpenFailed.is_failure());
        assert!(Event::ReadViewActivationFailed.is_failure());
        assert!(!Event::ReadViewOpened.is_failure());
    }

    #[test]
    fn test_routine_events() {
        assert!(Event::ReadViewActivated.is_routine());
        assert!(!Event::ReadViewOpened.is_routine());
    }
}
