//! Engine and index errors

use thiserror::Error;

/// Result type for engine and index operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by storage engines and their indexes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Engine '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Engine '{0}' is not registered")]
    UnknownEngine(String),

    #[error("Engine '{0}' does not support read views")]
    ReadViewUnsupported(String),

    #[error("Engine '{engine}' reached its limit of {limit} open read views")]
    ReadViewLimit { engine: String, limit: usize },

    #[error("Duplicate key in unique index '{index}'")]
    DuplicateKey { index: String },

    #[error("Field {field} is missing or cannot be used as an index key")]
    InvalidKey { field: u32 },

    #[error("Space {0} has no primary index")]
    NoPrimaryIndex(u32),

    #[error("Out of memory while building {0}")]
    OutOfMemory(&'static str),

    #[error("Engine failure: {0}")]
    Internal(String),
}

impl EngineError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::AlreadyRegistered(_) => "RV_ENGINE_ALREADY_REGISTERED",
            EngineError::UnknownEngine(_) => "RV_ENGINE_UNKNOWN",
            EngineError::ReadViewUnsupported(_) => "RV_ENGINE_UNSUPPORTED",
            EngineError::ReadViewLimit { .. } => "RV_ENGINE_READ_VIEW_LIMIT",
            EngineError::DuplicateKey { .. } => "RV_INDEX_DUPLICATE_KEY",
            EngineError::InvalidKey { .. } => "RV_INDEX_INVALID_KEY",
            EngineError::NoPrimaryIndex(_) => "RV_SPACE_NO_PRIMARY_INDEX",
            EngineError::OutOfMemory(_) => "RV_OUT_OF_MEMORY",
            EngineError::Internal(_) => "RV_ENGINE_INTERNAL",
        }
    }
}
