//! Read view errors
//!
//! Every error here is recoverable: the operation that returned it has
//! already unwound whatever it built. Misuse of the activation contract
//! (wrong thread, closing an active view) is not reported here; it is a
//! programming error caught by debug assertions.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;
use crate::tuple::FormatError;
use crate::upgrade::UpgradeError;

/// Result type for read view operations
pub type ReadViewResult<T> = Result<T, ReadViewError>;

/// Result type for read view configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read view errors
#[derive(Debug, Error)]
pub enum ReadViewError {
    #[error("Failed to create read view of engine '{engine}': {source}")]
    Engine {
        engine: String,
        #[source]
        source: EngineError,
    },

    #[error("Failed to create read view of index {index_id} of space '{space}': {source}")]
    Index {
        space: String,
        index_id: u32,
        #[source]
        source: EngineError,
    },

    #[error("Failed to build tuple format for space '{space}': {source}")]
    Format {
        space: String,
        #[source]
        source: FormatError,
    },

    #[error("Failed to capture upgrade of space '{space}': {source}")]
    UpgradeCapture {
        space: String,
        #[source]
        source: UpgradeError,
    },

    #[error("Failed to activate upgrade of space '{space}': {source}")]
    Activation {
        space: String,
        #[source]
        source: UpgradeError,
    },

    #[error("Failed to upgrade tuple of space '{space}': {source}")]
    Upgrade {
        space: String,
        #[source]
        source: UpgradeError,
    },

    #[error("Read from index {index_id} of space '{space}' failed: {source}")]
    Read {
        space: String,
        index_id: u32,
        #[source]
        source: EngineError,
    },

    #[error("Space '{space}' has no index {index_id} in this read view")]
    NoSuchIndex { space: String, index_id: u32 },

    #[error("Out of memory while building {what} for space '{space}'")]
    OutOfMemory { space: String, what: &'static str },
}

impl ReadViewError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ReadViewError::Engine { .. } => "RV_ENGINE_READ_VIEW_FAILED",
            ReadViewError::Index { .. } => "RV_INDEX_READ_VIEW_FAILED",
            ReadViewError::Format { source, .. } => source.code(),
            ReadViewError::UpgradeCapture { .. } => "RV_UPGRADE_CAPTURE_FAILED",
            ReadViewError::Activation { .. } => "RV_UPGRADE_ACTIVATION_FAILED",
            ReadViewError::Upgrade { source, .. } => source.code(),
            ReadViewError::Read { source, .. } => source.code(),
            ReadViewError::NoSuchIndex { .. } => "RV_NO_SUCH_INDEX",
            ReadViewError::OutOfMemory { .. } => "RV_OUT_OF_MEMORY",
        }
    }

    /// Name of the space involved, if any
    pub fn space(&self) -> Option<&str> {
        match self {
            ReadViewError::Engine { .. } => None,
            ReadViewError::Index { space, .. }
            | ReadViewError::Format { space, .. }
            | ReadViewError::UpgradeCapture { space, .. }
            | ReadViewError::Activation { space, .. }
            | ReadViewError::Upgrade { space, .. }
            | ReadViewError::Read { space, .. }
            | ReadViewError::NoSuchIndex { space, .. }
            | ReadViewError::OutOfMemory { space, .. } => Some(space),
        }
    }
}

/// Read view configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read read view config '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid read view config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid read view config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "RV_CONFIG_IO",
            ConfigError::Parse(_) => "RV_CONFIG_PARSE",
            ConfigError::Invalid(_) => "RV_CONFIG_INVALID",
        }
    }
}
