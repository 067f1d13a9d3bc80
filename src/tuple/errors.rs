//! Tuple format errors

use thiserror::Error;

/// Result type for tuple format operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while building field dictionaries and runtime formats
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Duplicate field name '{0}' in format definition")]
    DuplicateFieldName(String),

    #[error("Tuple format limit of {0} live formats reached")]
    LimitReached(usize),

    #[error("Out of memory while building {0}")]
    OutOfMemory(&'static str),
}

impl FormatError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::DuplicateFieldName(_) => "RV_FORMAT_DUPLICATE_FIELD",
            FormatError::LimitReached(_) => "RV_FORMAT_LIMIT_REACHED",
            FormatError::OutOfMemory(_) => "RV_OUT_OF_MEMORY",
        }
    }
}
